use async_trait::async_trait;
use log::info;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::UserRepository;
use crate::error::AppError;
use crate::models::{NewUser, User};

/// Postgres-backed store.
///
/// `PgPool` is a reference-counted, thread-safe connection pool; cloning the
/// repository shares the same pool across workers.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool and applies the embedded migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        info!("Running migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn exists(&self, username: &str) -> Result<bool, AppError> {
        let found: Option<i32> = sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    async fn create(&self, user: NewUser) -> Result<Option<User>, AppError> {
        // The UNIQUE constraint on username decides; no separate lookup.
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password, role)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (username) DO NOTHING
             RETURNING id, username, email, password, role, created_at",
        )
        .bind(user.username)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.role)
        .fetch_optional(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password, role, created_at FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
