mod menu;

pub use menu::{ActionMenu, CANCEL_EVENT, LIST_EVENTS};

use crate::components::language_model::{ChatMessage, ChatModel};
use crate::error::{language_model_error, AppResult};
use rust_i18n::t;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Instruction that keeps the model from filling in missing details itself
pub const ROUTER_INSTRUCTION: &str = "Don't make assumptions about what values to plug into functions. Ask for clarification if a user request is ambiguous.";

/// An action the model asked us to run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCall {
    pub name: String,
    /// JSON-encoded argument object, possibly empty
    pub arguments: String,
}

/// Typed form of an [`ActionCall`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    ListEvents,
    CancelEvent { user_input: String },
    Unknown(String),
}

#[derive(Debug, Deserialize)]
struct CancelArguments {
    user_input: String,
}

impl ActionCall {
    /// Parse name and arguments into an [`ActionRequest`]
    pub fn request(&self) -> AppResult<ActionRequest> {
        match self.name.as_str() {
            LIST_EVENTS => Ok(ActionRequest::ListEvents),
            CANCEL_EVENT => {
                let args: CancelArguments = serde_json::from_str(&self.arguments).map_err(|e| {
                    language_model_error(&format!("Malformed cancel_event arguments: {}", e))
                })?;
                Ok(ActionRequest::CancelEvent {
                    user_input: args.user_input,
                })
            }
            other => Ok(ActionRequest::Unknown(other.to_string())),
        }
    }
}

/// What the model decided for one utterance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub text: Option<String>,
    pub action_calls: Vec<ActionCall>,
}

impl Reply {
    /// The model picked no action and answered (usually with a question) instead
    pub fn is_ambiguous(&self) -> bool {
        self.action_calls.is_empty()
    }
}

/// Decides which action, if any, an utterance asks for
#[derive(Clone)]
pub struct IntentRouter {
    model: Arc<dyn ChatModel>,
}

impl IntentRouter {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Send the utterance with the action menu and collect the model's decision
    pub async fn route(&self, utterance: &str, menu: &ActionMenu) -> AppResult<Reply> {
        let messages = [
            ChatMessage::system(ROUTER_INSTRUCTION),
            ChatMessage::user(utterance),
        ];

        let message = self.model.complete(&messages, menu.tools()).await?;

        let action_calls: Vec<ActionCall> = message
            .calls()
            .iter()
            .map(|call| ActionCall {
                name: call.function.name.clone(),
                arguments: call.function.arguments.clone(),
            })
            .collect();

        let mut text = message.content.filter(|c| !c.trim().is_empty());
        if action_calls.is_empty() && text.is_none() {
            text = Some(t!("clarify_request").to_string());
        }

        info!(
            "Routed utterance to {} action call(s): {:?}",
            action_calls.len(),
            action_calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
        );

        Ok(Reply { text, action_calls })
    }
}
