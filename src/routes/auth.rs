//! Delegated sign-in routes under `/api/auth`.
//!
//! Paths follow the NextAuth layout (`signin/{provider}`,
//! `callback/{provider}`, `session`, `signout`, `providers`, `error`) so a
//! browser front-end written against those conventions keeps working.

use crate::{
    auth::{
        auth_cookie, expired_cookie, safe_callback_path, IdentityProvider, Session, SessionKeys,
        CALLBACK_COOKIE, SESSION_COOKIE, STATE_COOKIE, STATE_TTL_MINUTES,
    },
    error::AppError,
};
use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie},
    get,
    http::header,
    post, web, HttpRequest, HttpResponse, Responder,
};
use log::{info, warn};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct SignInQuery {
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorQuery {
    pub error: Option<String>,
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn error_redirect(kind: &str) -> HttpResponse {
    let mut response = redirect(&format!("/api/auth/error?error={}", kind));
    if let Err(e) = response.add_removal_cookie(&expired_cookie(STATE_COOKIE)) {
        warn!("Failed to clear state cookie: {}", e);
    }
    response
}

fn set_cookie(response: &mut HttpResponse, cookie: &Cookie<'_>) -> Result<(), AppError> {
    response
        .add_cookie(cookie)
        .map_err(|e| AppError::InternalServerError(format!("Failed to set cookie: {}", e)))
}

fn ensure_provider(provider: &dyn IdentityProvider, requested: &str) -> Result<(), AppError> {
    if provider.id() == requested {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("Unknown provider: {}", requested)))
    }
}

/// Lists the configured sign-in providers.
#[get("/providers")]
pub async fn providers(provider: web::Data<dyn IdentityProvider>) -> impl Responder {
    let id = provider.id();
    let mut listing = serde_json::Map::new();
    listing.insert(
        id.to_string(),
        json!({
            "id": id,
            "name": provider.name(),
            "type": "oauth",
            "signinUrl": format!("/api/auth/signin/{}", id),
            "callbackUrl": format!("/api/auth/callback/{}", id),
        }),
    );
    HttpResponse::Ok().json(listing)
}

async fn begin_sign_in(
    provider: web::Data<dyn IdentityProvider>,
    path: web::Path<String>,
    query: web::Query<SignInQuery>,
) -> Result<HttpResponse, AppError> {
    ensure_provider(provider.get_ref(), &path)?;

    let state = Uuid::new_v4().to_string();
    let location = provider.authorization_url(&state)?;
    let ttl = CookieDuration::minutes(STATE_TTL_MINUTES);

    let mut response = HttpResponse::Found();
    response
        .insert_header((header::LOCATION, location))
        .cookie(auth_cookie(STATE_COOKIE, state, ttl));
    if let Some(landing) = query.callback_url.as_deref().and_then(safe_callback_path) {
        response.cookie(auth_cookie(CALLBACK_COOKIE, landing.to_string(), ttl));
    }
    Ok(response.finish())
}

/// Starts the consent flow: sets the state cookie and redirects to the provider.
#[get("/signin/{provider}")]
pub async fn sign_in(
    provider: web::Data<dyn IdentityProvider>,
    path: web::Path<String>,
    query: web::Query<SignInQuery>,
) -> Result<HttpResponse, AppError> {
    begin_sign_in(provider, path, query).await
}

/// Same as [`sign_in`], for form posts.
#[post("/signin/{provider}")]
pub async fn sign_in_post(
    provider: web::Data<dyn IdentityProvider>,
    path: web::Path<String>,
    query: web::Query<SignInQuery>,
) -> Result<HttpResponse, AppError> {
    begin_sign_in(provider, path, query).await
}

/// Completes the consent flow and establishes the session.
///
/// Every failure ends in a redirect to `/api/auth/error`; nothing about the
/// provider's response is echoed back to the browser.
#[get("/callback/{provider}")]
pub async fn callback(
    req: HttpRequest,
    provider: web::Data<dyn IdentityProvider>,
    keys: web::Data<SessionKeys>,
    path: web::Path<String>,
    query: web::Query<CallbackQuery>,
) -> Result<HttpResponse, AppError> {
    ensure_provider(provider.get_ref(), &path)?;

    if let Some(error) = &query.error {
        warn!("Provider {} returned error: {}", provider.id(), error);
        return Ok(error_redirect("AccessDenied"));
    }

    let expected_state = req.cookie(STATE_COOKIE).map(|c| c.value().to_string());
    let (code, state) = match (&query.code, &query.state) {
        (Some(code), Some(state)) => (code, state),
        _ => {
            warn!("Callback from {} without code or state", provider.id());
            return Ok(error_redirect("OAuthCallback"));
        }
    };
    if expected_state.as_deref() != Some(state.as_str()) {
        warn!("OAuth state mismatch on {} callback", provider.id());
        return Ok(error_redirect("OAuthCallback"));
    }

    let identity = match provider.exchange_code(code).await {
        Ok(identity) => identity,
        Err(e) => {
            warn!("Code exchange with {} failed: {}", provider.id(), e);
            return Ok(error_redirect("OAuthCallback"));
        }
    };

    let (token, claims) = keys.issue(&identity)?;
    let destination = req
        .cookie(CALLBACK_COOKIE)
        .and_then(|c| safe_callback_path(c.value()).map(str::to_string))
        .unwrap_or_else(|| "/".to_string());
    info!("Signed in {} via {}", claims.sub, provider.id());

    let mut response = redirect(&destination);
    set_cookie(
        &mut response,
        &auth_cookie(
            SESSION_COOKIE,
            token,
            CookieDuration::seconds(claims.exp - claims.iat),
        ),
    )?;
    set_cookie(&mut response, &expired_cookie(STATE_COOKIE))?;
    set_cookie(&mut response, &expired_cookie(CALLBACK_COOKIE))?;
    Ok(response)
}

/// Describes the current session, or `{}` when signed out.
#[get("/session")]
pub async fn session(current: Option<Session>) -> impl Responder {
    match current {
        Some(Session(claims)) => HttpResponse::Ok().json(json!({
            "user": {
                "name": claims.name,
                "email": claims.email,
                "image": claims.picture,
            },
            "expires": claims.expires_at().map(|at| at.to_rfc3339()),
        })),
        None => HttpResponse::Ok().json(json!({})),
    }
}

/// Ends the session by expiring the cookie.
#[post("/signout")]
pub async fn sign_out() -> impl Responder {
    HttpResponse::Ok()
        .cookie(expired_cookie(SESSION_COOKIE))
        .json(json!({ "url": "/" }))
}

/// Landing point for failed sign-in attempts.
#[get("/error")]
pub async fn auth_error(query: web::Query<ErrorQuery>) -> impl Responder {
    let kind = query.error.as_deref().unwrap_or("Default");
    HttpResponse::Unauthorized().json(json!({ "error": kind }))
}
