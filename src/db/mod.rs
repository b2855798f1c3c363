//! User persistence behind an injectable trait.
//!
//! Handlers receive a `web::Data<dyn UserRepository>` and never reach for a
//! global client. Production wiring uses [`PgUserRepository`]; tests and local
//! runs without Postgres use [`InMemoryUserRepository`].

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{NewUser, User};

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Whether `username` is already registered.
    ///
    /// A fast path only; [`UserRepository::create`] is what guarantees uniqueness.
    async fn exists(&self, username: &str) -> Result<bool, AppError>;

    /// Inserts `user` unless its username is taken.
    ///
    /// Returns `Ok(None)` on a username collision. The check and the insert are
    /// a single atomic step, so concurrent registrations of the same username
    /// produce exactly one record.
    async fn create(&self, user: NewUser) -> Result<Option<User>, AppError>;

    /// All users, ordered by id.
    async fn list(&self) -> Result<Vec<User>, AppError>;

    /// Cheap round trip used by the health check.
    async fn ping(&self) -> Result<(), AppError>;
}
