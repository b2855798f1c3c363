//! External identity providers for delegated sign-in.
//!
//! Only the OAuth 2.0 authorization-code grant is used: the browser is sent to
//! the provider's consent page, the provider redirects back with a `code`, and
//! the server trades that code for an access token and the user's profile.

use async_trait::async_trait;
use log::warn;
use reqwest::Url;
use serde::Deserialize;

use crate::config::GoogleConfig;
use crate::error::AppError;

/// A person as vouched for by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Short identifier used in route paths, e.g. `google`.
    fn id(&self) -> &'static str;

    /// Human-readable provider name.
    fn name(&self) -> &'static str;

    /// URL of the provider's consent page, carrying `state` for CSRF protection.
    fn authorization_url(&self, state: &str) -> Result<String, AppError>;

    /// Trades an authorization code for the signed-in identity.
    async fn exchange_code(&self, code: &str) -> Result<Identity, AppError>;
}

const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const GOOGLE_SCOPES: &str = "openid email profile";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

pub struct GoogleProvider {
    client: reqwest::Client,
    config: GoogleConfig,
    redirect_url: String,
}

impl GoogleProvider {
    pub fn new(config: GoogleConfig, redirect_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            redirect_url,
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn id(&self) -> &'static str {
        "google"
    }

    fn name(&self) -> &'static str {
        "Google"
    }

    fn authorization_url(&self, state: &str) -> Result<String, AppError> {
        let url = Url::parse_with_params(
            GOOGLE_AUTHORIZE_URL,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", GOOGLE_SCOPES),
                ("state", state),
            ],
        )
        .map_err(|e| AppError::InternalServerError(format!("Invalid authorize URL: {}", e)))?;
        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str) -> Result<Identity, AppError> {
        let response = self
            .client
            .post(GOOGLE_TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Google token exchange failed ({}): {}", status, body);
            return Err(AppError::Unauthorized(format!(
                "Token exchange rejected with status {}",
                status
            )));
        }
        let token: TokenResponse = response.json().await?;

        let profile: GoogleUserInfo = self
            .client
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(Identity {
            subject: profile.sub,
            email: profile.email,
            name: profile.name,
            picture: profile.picture,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GoogleProvider {
        GoogleProvider::new(
            GoogleConfig {
                client_id: "client-id".into(),
                client_secret: "client-secret".into(),
            },
            "http://localhost:8080/api/auth/callback/google".into(),
        )
    }

    #[test]
    fn test_authorization_url_carries_client_and_state() {
        let url = provider().authorization_url("state-123").unwrap();
        let parsed = Url::parse(&url).unwrap();
        let params: std::collections::HashMap<_, _> = parsed.query_pairs().into_owned().collect();

        assert_eq!(parsed.host_str(), Some("accounts.google.com"));
        assert_eq!(params["client_id"], "client-id");
        assert_eq!(params["state"], "state-123");
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["scope"], "openid email profile");
        assert_eq!(
            params["redirect_uri"],
            "http://localhost:8080/api/auth/callback/google"
        );
        assert!(!url.contains("client-secret"));
    }
}
