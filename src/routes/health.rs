use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use log::warn;
use serde_json::json;

use crate::db::UserRepository;

/// Health check endpoint
///
/// Reports the API status together with the reachability of the user store.
#[get("/health")]
pub async fn health(repo: web::Data<dyn UserRepository>) -> impl Responder {
    match repo.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "database": "ok",
            "timestamp": Utc::now()
        })),
        Err(e) => {
            warn!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "degraded",
                "database": "unavailable",
                "timestamp": Utc::now()
            }))
        }
    }
}
