//! HTTP API module
//!
//! Control surface for the view layer: timer controls, settings file
//! handling, settings access and the live display mirror.

pub mod error;
pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/stop", post(stop_handler))
        .route("/next", post(next_handler))
        .route("/adjust", post(adjust_handler))
        .route("/add-minute", post(add_minute_handler))
        .route("/subtract-minute", post(subtract_minute_handler))
        .route("/open", post(open_handler))
        .route("/save", post(save_handler))
        .route("/save-as", post(save_as_handler))
        .route("/settings", get(settings_handler))
        .route("/settings/:path", get(get_setting_handler).put(put_setting_handler))
        .route("/display", get(display_handler))
        .route("/display/events", get(display_events_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
