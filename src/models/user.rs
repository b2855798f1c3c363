use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Role given to every account created through registration.
pub const DEFAULT_ROLE: &str = "user";

/// A registered account as stored and as returned by the API.
///
/// `password` holds the bcrypt hash, never the plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Registration payload for `POST /api/users`.
///
/// All three fields must be present; their contents are taken as given.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String, // plaintext, hashed before it reaches a store
}

/// A row ready for insertion: the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

impl NewUser {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            username,
            email,
            password_hash,
            role: DEFAULT_ROLE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_request_requires_every_field() {
        let parsed: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "username": "bob",
            "email": "bob",
            "password": "x"
        }))
        .unwrap();
        assert_eq!(parsed.email, "bob");

        let missing = serde_json::from_value::<CreateUserRequest>(serde_json::json!({
            "username": "bob",
            "password": "x"
        }));
        assert!(missing.is_err());
    }

    #[test]
    fn test_new_user_defaults_role() {
        let user = NewUser::new("alice".into(), "alice@example.com".into(), "$2b$10$hash".into());
        assert_eq!(user.role, "user");
    }

    #[test]
    fn test_user_serializes_stored_fields() {
        let user = User {
            id: 7,
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "$2b$10$hash".into(),
            role: DEFAULT_ROLE.into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["username"], "alice");
        assert_eq!(json["role"], "user");
        assert_eq!(json["password"], "$2b$10$hash");
        assert!(json["created_at"].is_string());
    }
}
