//! # mb-api
//!
//! The web routing and orchestration layer for the message board.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod identity;
pub mod middleware;

use actix_web::web;

pub use error::ApiError;
pub use extract::DEFAULT_FORM_LIMIT;
pub use handlers::AppState;

/// Configures the routes for the board with the default body limit.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    configure_routes_with_limit(cfg, DEFAULT_FORM_LIMIT);
}

/// Configures the routes, capping `POST /` bodies at `form_limit` bytes.
///
/// # Developer Note
/// Everything lives on `/`; the method and the `action` form field pick the
/// operation, which keeps the page's `fetch('/')` calls trivial.
pub fn configure_routes_with_limit(cfg: &mut web::ServiceConfig, form_limit: usize) {
    cfg.service(
        web::resource("/")
            .app_data(extract::query_config())
            .app_data(extract::form_config(form_limit))
            .app_data(extract::multipart_config(form_limit))
            // The board page, optionally filtered by ?search=
            .route(web::get().to(handlers::index))
            // action=post | action=vote
            .route(web::post().to(handlers::handle_action)),
    )
    .route("/healthz", web::get().to(handlers::healthz));
}
