use super::models::{ChatMessage, ToolDefinition};
use super::ChatModel;
use crate::config::Config;
use crate::error::{language_model_error, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error};

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [ToolDefinition],
}

fn no_tools(tools: &&[ToolDefinition]) -> bool {
    tools.is_empty()
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Single-attempt client for an OpenAI-compatible chat completions endpoint
#[derive(Clone)]
pub struct OpenAiClient {
    config: Arc<RwLock<Config>>,
    client: Client,
}

impl OpenAiClient {
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> AppResult<ChatMessage> {
        let (base_url, api_key, model) = {
            let config_read = self.config.read().await;
            (
                config_read.openai_base_url.clone(),
                config_read.openai_api_key.clone(),
                config_read.model.clone(),
            )
        };

        let request = CompletionRequest {
            model: &model,
            messages,
            tools,
        };

        let url = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        debug!("Sending {} messages to {}", messages.len(), model);

        let response = self
            .client
            .post(url)
            .bearer_auth(&api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| language_model_error(&format!("Request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| language_model_error(&format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            error!("Chat completion failed with {}: {}", status, text);
            return Err(language_model_error(&format!(
                "Request failed with status {}",
                status
            )));
        }

        let parsed: CompletionResponse = serde_json::from_str(&text)
            .map_err(|e| language_model_error(&format!("Failed to parse response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| language_model_error("No choices in response"))
    }
}
