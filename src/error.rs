//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Each variant is one kind of failure, and each kind maps to exactly one HTTP status.
//! Responses always carry a JSON body of the form `{"error": "<message>"}`.
//!
//! `From` implementations cover `sqlx::Error`, `jsonwebtoken::errors::Error`,
//! `bcrypt::BcryptError` and `reqwest::Error`, so handlers can lean on the `?` operator.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// The request is malformed or fails validation (HTTP 400).
    BadRequest(String),
    /// The request collides with existing state, e.g. a taken username.
    /// Reported as HTTP 400 to keep the public registration contract.
    Conflict(String),
    /// Authentication is missing or invalid (HTTP 401).
    Unauthorized(String),
    /// A requested resource was not found (HTTP 404).
    NotFound(String),
    /// The backing store failed or is unreachable (HTTP 500).
    /// The detail is kept for logs; clients only see a generic message.
    DatabaseError(String),
    /// Any other unexpected server-side failure (HTTP 500).
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::DatabaseError(_) => "Database error",
            AppError::BadRequest(msg)
            | AppError::Conflict(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::InternalServerError(msg) => msg.as_str(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// `RowNotFound` becomes `NotFound`; everything else is a store failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::DatabaseError(error.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

/// Failures talking to the identity provider reject the sign-in attempt.
impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> AppError {
        AppError::Unauthorized(format!("Identity provider request failed: {}", error))
    }
}
