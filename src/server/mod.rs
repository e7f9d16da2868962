//! HTTP surface: welcome, upload, ask and health routes.

pub mod error;
pub mod handlers;
pub mod state;
pub mod types;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

pub use error::ApiError;
pub use handlers::{ask_handler, health_handler, home_handler, upload_handler};
pub use state::AppState;

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config().server.max_upload_bytes;
    Router::new()
        .route("/", get(home_handler))
        .route("/healthz", get(health_handler))
        .route("/upload", post(upload_handler))
        .route("/ask", post(ask_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
