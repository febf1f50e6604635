mod handlers;
mod views;

use crate::commands::ChatContext;
use axum::routing::{get, post};
use axum::Router;
use chrono_tz::Tz;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use handlers::{api_chat_handler, health_handler, index_handler, submit_handler};

#[derive(Clone)]
pub struct AppState {
    /// Turn runner shared by every request
    pub chat: Arc<ChatContext>,
    /// Timezone for displayed event times
    pub timezone: Tz,
    /// Locale of the page chrome
    pub locale: String,
}

/// Build the web interface
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler).post(submit_handler))
        .route("/api/chat", post(api_chat_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
