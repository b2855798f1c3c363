use crate::{
    auth::hash_password,
    db::UserRepository,
    error::AppError,
    models::{CreateUserRequest, NewUser},
};
use actix_web::{error::JsonPayloadError, get, post, web, HttpRequest, HttpResponse, Responder};
use log::{error, info};

const CREATE_FAILED: &str = "Failed to create user";
const FETCH_FAILED: &str = "Failed to fetch users";
const USERNAME_TAKEN: &str = "Username already exists";

/// JSON extractor settings for the users scope.
///
/// A body that is missing, not JSON, or lacks a field never reaches the
/// handler; it is answered with the generic creation failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, req: &HttpRequest| {
        error!("Rejected payload on {}: {}", req.path(), err);
        AppError::InternalServerError(CREATE_FAILED.into()).into()
    })
}

fn create_failed(context: &str, e: impl std::fmt::Display) -> AppError {
    error!("Error creating user ({}): {}", context, e);
    AppError::InternalServerError(CREATE_FAILED.into())
}

/// Registers a new user.
///
/// ## Request Body:
/// `{"username": ..., "email": ..., "password": ...}`
///
/// ## Responses:
/// - `201 Created`: the stored user record.
/// - `400 Bad Request`: `{"error": "Username already exists"}`.
/// - `500 Internal Server Error`: `{"error": "Failed to create user"}`.
#[post("")]
pub async fn create_user(
    repo: web::Data<dyn UserRepository>,
    payload: web::Json<CreateUserRequest>,
) -> Result<impl Responder, AppError> {
    let CreateUserRequest {
        username,
        email,
        password,
    } = payload.into_inner();

    // Skip the hash for names already taken; the insert below still decides races.
    if repo
        .exists(&username)
        .await
        .map_err(|e| create_failed("lookup", e))?
    {
        info!("Registration refused, username {} is taken", username);
        return Err(AppError::Conflict(USERNAME_TAKEN.into()));
    }

    let password_hash = web::block(move || hash_password(&password))
        .await
        .map_err(|e| create_failed("hash task", e))?
        .map_err(|e| create_failed("hash", e))?;

    let created = repo
        .create(NewUser::new(username.clone(), email, password_hash))
        .await
        .map_err(|e| create_failed("insert", e))?;

    match created {
        Some(user) => {
            info!("Registered user {} (id {})", user.username, user.id);
            Ok(HttpResponse::Created().json(user))
        }
        None => {
            info!("Registration lost a race, username {} is taken", username);
            Err(AppError::Conflict(USERNAME_TAKEN.into()))
        }
    }
}

/// Lists every registered user.
///
/// ## Responses:
/// - `200 OK`: JSON array of user records.
/// - `500 Internal Server Error`: `{"error": "Failed to fetch users"}`.
#[get("")]
pub async fn list_users(repo: web::Data<dyn UserRepository>) -> Result<impl Responder, AppError> {
    let users = repo.list().await.map_err(|e| {
        error!("Error fetching users: {}", e);
        AppError::InternalServerError(FETCH_FAILED.into())
    })?;

    Ok(HttpResponse::Ok().json(users))
}
