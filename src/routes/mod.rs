pub mod auth;
pub mod health;
pub mod pages;
pub mod users;

use actix_web::web;

/// Registers every route.
///
/// Expects `web::Data<dyn UserRepository>`, `web::Data<dyn IdentityProvider>`
/// and `web::Data<SessionKeys>` to be present in app data.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(pages::welcome)
        .service(health::health)
        .service(
            web::scope("/api/auth")
                .service(auth::providers)
                .service(auth::sign_in)
                .service(auth::sign_in_post)
                .service(auth::callback)
                .service(auth::session)
                .service(auth::sign_out)
                .service(auth::auth_error),
        )
        .service(
            web::scope("/api/users")
                .app_data(users::json_config())
                .service(users::list_users)
                .service(users::create_user),
        );
}
