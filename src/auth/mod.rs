pub mod extractors;
pub mod password;
pub mod provider;
pub mod token;

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};

pub use extractors::Session;
pub use password::{hash_password, verify_password};
pub use provider::{GoogleProvider, Identity, IdentityProvider};
pub use token::{SessionClaims, SessionKeys};

/// Cookie holding the signed session token.
pub const SESSION_COOKIE: &str = "portico.session-token";
/// Cookie holding the OAuth `state` while the user is at the provider.
pub const STATE_COOKIE: &str = "portico.state";
/// Cookie remembering where to land after sign-in.
pub const CALLBACK_COOKIE: &str = "portico.callback-url";

/// How long a sign-in attempt may take before its state cookie lapses.
pub const STATE_TTL_MINUTES: i64 = 10;

/// An HttpOnly, `SameSite=Lax` cookie scoped to the whole site.
pub fn auth_cookie(name: &'static str, value: String, max_age: CookieDuration) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .finish()
}

/// A cookie that instructs the browser to drop `name`.
pub fn expired_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = auth_cookie(name, String::new(), CookieDuration::ZERO);
    cookie.make_removal();
    cookie
}

/// Accepts only same-site relative paths as post-sign-in destinations.
pub fn safe_callback_path(candidate: &str) -> Option<&str> {
    let is_relative = candidate.starts_with('/')
        && !candidate.starts_with("//")
        && !candidate.starts_with("/\\");
    is_relative.then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_callback_path() {
        assert_eq!(safe_callback_path("/"), Some("/"));
        assert_eq!(safe_callback_path("/dashboard?tab=1"), Some("/dashboard?tab=1"));
        assert_eq!(safe_callback_path("https://evil.example"), None);
        assert_eq!(safe_callback_path("//evil.example"), None);
        assert_eq!(safe_callback_path("/\\evil.example"), None);
        assert_eq!(safe_callback_path("dashboard"), None);
    }

    #[test]
    fn test_auth_cookie_attributes() {
        let cookie = auth_cookie(STATE_COOKIE, "abc".into(), CookieDuration::minutes(10));
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }

    #[test]
    fn test_expired_cookie_is_removal() {
        let cookie = expired_cookie(SESSION_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }
}
