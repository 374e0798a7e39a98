//! # diary-api
//!
//! The web routing and orchestration layer for the diary.

pub mod error;
pub mod frontend;
pub mod handlers;
pub mod middleware;

use actix_web::{middleware::from_fn, web};

pub use error::ApiError;
pub use frontend::{configure_frontend, Frontend};
pub use handlers::AppState;
pub use middleware::RateLimiter;

/// Configures the JSON API under `/api`.
///
/// The rate limiter only applies when a `web::Data<RateLimiter>` is
/// registered on the app.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .wrap(from_fn(middleware::rate_limit))
            .app_data(handlers::json_config())
            .route("/entries", web::get().to(handlers::list_entries))
            .route("/entries", web::post().to(handlers::create_entry))
            .route("/entries/{id}", web::delete().to(handlers::delete_entry)),
    );
}
