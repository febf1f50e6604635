use crate::components::event_resolver::{CancelOutcome, EventResolver};
use crate::components::intent_router::{ActionCall, ActionMenu, ActionRequest, IntentRouter};
use crate::components::{ChatModel, SchedulingService};
use crate::config::Config;
use crate::error::AppResult;
use rust_i18n::t;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// Shared context for chat turns
#[derive(Clone)]
pub struct ChatContext {
    pub config: Arc<RwLock<Config>>,
    calendar: Arc<dyn SchedulingService>,
    router: IntentRouter,
    resolver: EventResolver,
    menu: ActionMenu,
}

/// What one dispatched action call produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Raw event collection as returned by the scheduling service
    Listed { events: Vec<Value> },
    Cancelled { identifier: String },
    NotCancelled,
    Failed { action: String, message: String },
}

impl ActionOutcome {
    /// Short user-facing line for this outcome
    pub fn message(&self) -> String {
        match self {
            ActionOutcome::Listed { events } => t!("events_listed", count = events.len()).to_string(),
            ActionOutcome::Cancelled { .. } => t!("event_cancelled").to_string(),
            ActionOutcome::NotCancelled => t!("event_not_cancelled").to_string(),
            ActionOutcome::Failed { action, message } => {
                t!("action_failed", action = action, error = message).to_string()
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ActionOutcome::NotCancelled | ActionOutcome::Failed { .. })
    }
}

/// Everything shown to the user after one turn
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TurnReport {
    pub assistant_text: Option<String>,
    pub outcomes: Vec<ActionOutcome>,
    /// Set when the routing call itself failed
    pub failure: Option<String>,
}

impl ChatContext {
    /// Create a new chat context from the two remote services
    pub fn new(
        config: Arc<RwLock<Config>>,
        calendar: Arc<dyn SchedulingService>,
        model: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            router: IntentRouter::new(Arc::clone(&model)),
            resolver: EventResolver::new(Arc::clone(&config), Arc::clone(&calendar), model),
            calendar,
            config,
            menu: ActionMenu::calendar(),
        }
    }

    /// Run one isolated turn: route the utterance, then dispatch each action call in order
    pub async fn run_turn(&self, utterance: &str) -> TurnReport {
        info!("Starting chat turn");

        let reply = match self.router.route(utterance, &self.menu).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Routing failed: {}", e);
                return TurnReport {
                    failure: Some(t!("turn_failed", error = e.to_string()).to_string()),
                    ..Default::default()
                };
            }
        };

        let mut outcomes = Vec::with_capacity(reply.action_calls.len());
        for call in &reply.action_calls {
            let outcome = match self.dispatch(call).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Action {} failed: {}", call.name, e);
                    ActionOutcome::Failed {
                        action: call.name.clone(),
                        message: e.to_string(),
                    }
                }
            };
            outcomes.push(outcome);
        }

        TurnReport {
            assistant_text: reply.text,
            outcomes,
            failure: None,
        }
    }

    async fn dispatch(&self, call: &ActionCall) -> AppResult<ActionOutcome> {
        match call.request()? {
            ActionRequest::ListEvents => {
                let events = self.calendar.list_events().await?;
                Ok(ActionOutcome::Listed {
                    events: events.iter().map(|e| e.raw().clone()).collect(),
                })
            }
            ActionRequest::CancelEvent { user_input } => {
                match self.resolver.cancel_by_utterance(&user_input).await? {
                    CancelOutcome::Cancelled(identifier) => Ok(ActionOutcome::Cancelled { identifier }),
                    CancelOutcome::NotFound => {
                        info!("No event matched {:?}", user_input);
                        Ok(ActionOutcome::NotCancelled)
                    }
                }
            }
            ActionRequest::Unknown(name) => Ok(ActionOutcome::Failed {
                message: t!("unknown_action").to_string(),
                action: name,
            }),
        }
    }
}
