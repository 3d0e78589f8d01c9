//! HTTP handlers and route configuration.

mod health;
pub mod posts;

use actix_web::{HttpResponse, error, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                // Post routes
                .service(
                    web::scope("/v1/posts")
                        .route("", web::get().to(posts::list))
                        .route("", web::post().to(posts::create))
                        .route("/", web::route().to(posts::missing_id))
                        .route("/{id}", web::get().to(posts::get))
                        .route("/{id}", web::patch().to(posts::update))
                        .route("/{id}", web::delete().to(posts::delete)),
                ),
        );
}

/// Fallback for unmatched routes.
pub async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound("No route matches this path".to_string()))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let detail = format!("Invalid JSON body: {}", err);
        error::Error::from(AppError::BadRequest(detail))
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let detail = format!("Invalid query string: {}", err);
        error::Error::from(AppError::BadRequest(detail))
    })
}
