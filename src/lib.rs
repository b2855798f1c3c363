#![doc = "The `portico` library crate."]
#![doc = ""]
#![doc = "User registration and listing, Google sign-in with cookie sessions, and a"]
#![doc = "static welcome page. The binary (`main.rs`) wires configuration, the user"]
#![doc = "store and the identity provider into an actix-web server."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

pub use crate::config::Config;
pub use crate::error::AppError;
