#![allow(dead_code)]

use actix_web::web;
use async_trait::async_trait;
use portico::auth::{Identity, IdentityProvider, SessionKeys};
use portico::db::UserRepository;
use portico::AppError;
use std::sync::Arc;

pub const SESSION_SECRET: &str = "integration-session-secret";
pub const GOOD_CODE: &str = "good-code";

/// Identity provider that accepts a single known authorization code.
pub struct StubProvider;

#[async_trait]
impl IdentityProvider for StubProvider {
    fn id(&self) -> &'static str {
        "google"
    }

    fn name(&self) -> &'static str {
        "Google"
    }

    fn authorization_url(&self, state: &str) -> Result<String, AppError> {
        Ok(format!("https://provider.test/authorize?state={}", state))
    }

    async fn exchange_code(&self, code: &str) -> Result<Identity, AppError> {
        if code == GOOD_CODE {
            Ok(Identity {
                subject: "google-1001".into(),
                email: Some("carol@example.com".into()),
                name: Some("Carol".into()),
                picture: Some("https://provider.test/carol.png".into()),
            })
        } else {
            Err(AppError::Unauthorized("invalid_grant".into()))
        }
    }
}

pub fn repo_data(repo: Arc<dyn UserRepository>) -> web::Data<dyn UserRepository> {
    web::Data::from(repo)
}

pub fn provider_data() -> web::Data<dyn IdentityProvider> {
    let provider: Arc<dyn IdentityProvider> = Arc::new(StubProvider);
    web::Data::from(provider)
}

pub fn keys_data() -> web::Data<SessionKeys> {
    web::Data::new(SessionKeys::new(SESSION_SECRET))
}

/// Builds the full application around the given user store.
macro_rules! test_app {
    ($repo:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(common::repo_data($repo))
                .app_data(common::provider_data())
                .app_data(common::keys_data())
                .configure(portico::routes::config),
        )
        .await
    };
}
