//! Route configuration

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::{web, HttpRequest};

use crate::error::AppError;
use crate::handlers;
use crate::metrics::metrics_handler;
use crate::middleware::JwtAuthMiddleware;
use crate::AppState;

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::InvalidInput(format!("Invalid request body: {}", err)).into()
}

fn path_error_handler(_err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::NotFound("Car not found".to_string()).into()
}

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: web::Data<AppState>) {
    let auth = JwtAuthMiddleware::new(state.tokens.clone());

    cfg.app_data(state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        // Public endpoints
        .route("/health", web::get().to(handlers::health_check))
        .route("/metrics", web::get().to(metrics_handler))
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(handlers::register))
                .route("/login", web::post().to(handlers::login))
                .service(
                    web::resource("/logout")
                        .route(web::post().to(handlers::logout))
                        .wrap(auth.clone()),
                ),
        )
        .service(
            web::scope("/cars")
                .wrap(auth)
                .route("", web::get().to(handlers::list_cars))
                .route("", web::post().to(handlers::create_car))
                .route("/", web::get().to(handlers::list_cars))
                .route("/", web::post().to(handlers::create_car))
                // Registered before /{id} so it is not parsed as an id
                .route("/protected", web::get().to(handlers::protected))
                .route("/{id}", web::get().to(handlers::get_car))
                .route("/{id}", web::put().to(handlers::update_car))
                .route("/{id}", web::delete().to(handlers::delete_car)),
        );
}
