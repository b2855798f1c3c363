use crate::error::AppError;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::provider::Identity;

/// Lifetime of a signed-in session.
pub const SESSION_TTL_DAYS: i64 = 30;

/// Claims carried by the session token stored in the session cookie.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Provider-scoped account identifier.
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// Signs and verifies session tokens with the configured secret.
///
/// Built once from `Config::session_secret` and shared through `web::Data`.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issues a session token for a freshly authenticated identity.
    pub fn issue(&self, identity: &Identity) -> Result<(String, SessionClaims), AppError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: identity.subject.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            picture: identity.picture.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::days(SESSION_TTL_DAYS)).timestamp(),
        };
        let token = self.sign(&claims)?;
        Ok((token, claims))
    }

    pub fn sign(&self, claims: &SessionClaims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to sign session: {}", e)))
    }

    /// Verifies signature and expiry.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        decode::<SessionClaims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid session: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            subject: "google-123".into(),
            email: Some("alice@example.com".into()),
            name: Some("Alice".into()),
            picture: None,
        }
    }

    #[test]
    fn test_session_issue_and_verify() {
        let keys = SessionKeys::new("test_secret_for_sessions");
        let (token, issued) = keys.issue(&identity()).unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims, issued);
        assert_eq!(claims.sub, "google-123");
        assert_eq!(claims.exp - claims.iat, SESSION_TTL_DAYS * 24 * 60 * 60);
        assert!(claims.expires_at().is_some());
    }

    #[test]
    fn test_expired_session_is_rejected() {
        let keys = SessionKeys::new("test_secret_for_expiration");
        let past = Utc::now() - Duration::hours(2);
        let claims = SessionClaims {
            sub: "google-123".into(),
            email: None,
            name: None,
            picture: None,
            iat: (past - Duration::hours(1)).timestamp(),
            exp: past.timestamp(),
        };
        let token = keys.sign(&claims).unwrap();

        match keys.verify(&token) {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("ExpiredSignature")),
            other => panic!("Expected expired session to be rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_session_signed_with_other_secret_is_rejected() {
        let (token, _) = SessionKeys::new("one").issue(&identity()).unwrap();
        let result = SessionKeys::new("another").verify(&token);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let keys = SessionKeys::new("secret");
        assert!(keys.verify("not-a-jwt").is_err());
    }
}
