use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use futures::future::{ready, Ready};

use super::token::{SessionClaims, SessionKeys};
use super::SESSION_COOKIE;
use crate::error::AppError;

/// The signed-in user, read from the session cookie.
///
/// Requires `web::Data<SessionKeys>` in app data. A missing, forged or expired
/// session cookie rejects the request with `AppError::Unauthorized`.
#[derive(Debug, Clone)]
pub struct Session(pub SessionClaims);

impl FromRequest for Session {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_session(req).map_err(Into::into))
    }
}

fn extract_session(req: &HttpRequest) -> Result<Session, AppError> {
    let keys = req
        .app_data::<web::Data<SessionKeys>>()
        .ok_or_else(|| AppError::InternalServerError("Session keys not configured".into()))?;
    let cookie = req
        .cookie(SESSION_COOKIE)
        .ok_or_else(|| AppError::Unauthorized("No active session".into()))?;

    keys.verify(cookie.value()).map(Session)
}
