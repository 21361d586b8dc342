/// API route modules
pub mod control;
pub mod health;
pub mod media;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Action endpoints, health and the virtual directory fallback
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/services", get(control::list_services))
        .route("/ctl/:service/:action", post(control::invoke_action))
        .fallback(media::serve_virtual)
        .with_state(app_state)
}
