mod client;
pub mod models;
mod retry;

pub use client::OpenAiClient;
pub use models::{ChatMessage, FunctionCall, Role, ToolCall, ToolDefinition};
pub use retry::{RetryPolicy, RetryingChatModel};

use crate::error::AppResult;
use async_trait::async_trait;

/// A chat completion backend
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send one turn and return the assistant message
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> AppResult<ChatMessage>;
}
