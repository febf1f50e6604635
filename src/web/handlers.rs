use super::views::ChatPage;
use super::AppState;
use askama::Template;
use axum::extract::{Form, Json, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use rust_i18n::t;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

/// Body of both the HTML form and the JSON endpoint
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

/// Handler for the empty chat page
pub async fn index_handler(State(state): State<AppState>) -> Response {
    render(ChatPage::new("", &state.locale))
}

/// Handler for the Send button: one turn per submission
pub async fn submit_handler(State(state): State<AppState>, Form(form): Form<ChatForm>) -> Response {
    let message = form.message.trim();
    if message.is_empty() {
        let notice = t!("empty_message", locale = state.locale.as_str()).to_string();
        return render(ChatPage::new("", &state.locale).with_notice(notice));
    }

    let report = state.chat.run_turn(message).await;
    render(ChatPage::new(message, &state.locale).with_report(&report, &state.timezone))
}

/// JSON variant of a turn for scripted clients
pub async fn api_chat_handler(
    State(state): State<AppState>,
    Json(form): Json<ChatForm>,
) -> Response {
    let message = form.message.trim();
    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": t!("empty_message").to_string() })),
        )
            .into_response();
    }

    Json(state.chat.run_turn(message).await).into_response()
}

/// Health check
pub async fn health_handler() -> &'static str {
    "OK"
}

fn render(page: ChatPage) -> Response {
    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render chat page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}
