use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info};
use std::sync::Arc;

use portico::{
    auth::{GoogleProvider, IdentityProvider, SessionKeys},
    config::Config,
    db::{PgUserRepository, UserRepository},
    routes,
};

fn cors(allowed_origin: Option<&str>) -> Cors {
    match allowed_origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600),
        None => Cors::default(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    let repo = PgUserRepository::connect(&config.database_url, config.database_max_connections)
        .await
        .map_err(|e| {
            error!("Failed to initialize database: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e)
        })?;

    let repo: Arc<dyn UserRepository> = Arc::new(repo);
    let provider: Arc<dyn IdentityProvider> = Arc::new(GoogleProvider::new(
        config.google.clone(),
        config.google_redirect_url(),
    ));
    let repo = web::Data::from(repo);
    let provider = web::Data::from(provider);
    let keys = web::Data::new(SessionKeys::new(&config.session_secret));
    let cors_origin = config.cors_allowed_origin.clone();

    info!("Starting server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(repo.clone())
            .app_data(provider.clone())
            .app_data(keys.clone())
            .wrap(cors(cors_origin.as_deref()))
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
