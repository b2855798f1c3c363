//! Process configuration, loaded once at startup.
//!
//! Every secret the server needs is read here, before anything binds a socket.
//! A missing Google client or session secret is a startup error, not something
//! a request handler discovers later.

use std::env;
use std::fmt;

/// Errors raised while assembling a [`Config`].
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    Missing(&'static str),
    /// A variable is set but cannot be parsed.
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid(key, value) => write!(f, "{} has an invalid value: {}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Credentials for the Google OAuth client.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    /// Externally visible base URL, used to build OAuth redirect URIs.
    pub public_url: String,
    pub google: GoogleConfig,
    pub session_secret: String,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &'static str| optional(key).ok_or(ConfigError::Missing(key));

        let server_host = optional("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let server_port = match optional("SERVER_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("SERVER_PORT", raw))?,
            None => 8080,
        };
        let database_max_connections = match optional("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("DATABASE_MAX_CONNECTIONS", raw))?,
            None => 5,
        };
        let public_url = optional("PUBLIC_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://{}:{}", server_host, server_port));

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections,
            server_port,
            server_host,
            public_url,
            google: GoogleConfig {
                client_id: required("GOOGLE_CLIENT_ID")?,
                client_secret: required("GOOGLE_CLIENT_SECRET")?,
            },
            session_secret: required("SESSION_SECRET")?,
            cors_allowed_origin: optional("CORS_ALLOWED_ORIGIN"),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }

    /// Where Google sends the user back after consent.
    pub fn google_redirect_url(&self) -> String {
        format!("{}/api/auth/callback/google", self.public_url)
    }
}
