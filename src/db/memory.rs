use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

use super::UserRepository;
use crate::error::AppError;
use crate::models::{NewUser, User};

/// Process-local store for tests and database-less development.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.lock().map(|users| users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> AppError {
    AppError::DatabaseError("in-memory store lock poisoned".into())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn exists(&self, username: &str) -> Result<bool, AppError> {
        let users = self.users.lock().map_err(poisoned)?;
        Ok(users.iter().any(|existing| existing.username == username))
    }

    async fn create(&self, user: NewUser) -> Result<Option<User>, AppError> {
        let mut users = self.users.lock().map_err(poisoned)?;
        if users.iter().any(|existing| existing.username == user.username) {
            return Ok(None);
        }

        let created = User {
            id: users.last().map_or(1, |last| last.id + 1),
            username: user.username,
            email: user.email,
            password: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(Some(created))
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let users = self.users.lock().map_err(poisoned)?;
        Ok(users.clone())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.users.lock().map(|_| ()).map_err(poisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_user(username: &str) -> NewUser {
        NewUser::new(
            username.to_string(),
            format!("{}@example.com", username),
            "$2b$10$hash".to_string(),
        )
    }

    #[actix_rt::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryUserRepository::new();

        let first = repo.create(new_user("alice")).await.unwrap().unwrap();
        let second = repo.create(new_user("bob")).await.unwrap().unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(second.role, "user");
    }

    #[actix_rt::test]
    async fn test_duplicate_username_is_rejected() {
        let repo = InMemoryUserRepository::new();

        assert!(!repo.exists("alice").await.unwrap());
        assert!(repo.create(new_user("alice")).await.unwrap().is_some());
        assert!(repo.exists("alice").await.unwrap());
        assert!(repo.create(new_user("alice")).await.unwrap().is_none());
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[actix_rt::test]
    async fn test_concurrent_duplicates_create_one_record() {
        let repo = Arc::new(InMemoryUserRepository::new());

        let attempts: Vec<_> = (0..16)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.create(new_user("racer")).await })
            })
            .collect();

        let mut created = 0;
        for attempt in attempts {
            if attempt.await.unwrap().unwrap().is_some() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(repo.len(), 1);
    }
}
