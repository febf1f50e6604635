#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use eventchat::commands::ChatContext;
use eventchat::components::language_model::{
    ChatMessage, FunctionCall, Role, ToolCall, ToolDefinition,
};
use eventchat::components::scheduling::ScheduledEvent;
use eventchat::components::{ChatModel, SchedulingService};
use eventchat::config::Config;
use eventchat::error::{language_model_error, scheduling_error, AppResult};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::RwLock;

/// Test configuration with fake credentials
pub fn test_config() -> Arc<RwLock<Config>> {
    let mut config = Config::with_credentials(
        "test_calendly_key",
        "https://api.calendly.com/users/test-user",
        "test_openai_key",
    );
    config.cancel_reason = "Test cancellation".to_string();
    Arc::new(RwLock::new(config))
}

/// Test configuration with both remote services pointed at `base_url`
pub fn server_config(base_url: &str) -> Arc<RwLock<Config>> {
    let config = test_config();
    {
        let mut config_write = config.try_write().unwrap();
        config_write.calendly_base_url = base_url.to_string();
        config_write.openai_base_url = format!("{}/v1", base_url);
    }
    config
}

/// Serve a router on a random local port and return its base URL.
/// The builder receives the base URL so responses can link back to the server.
pub async fn spawn_server<F>(build: F) -> String
where
    F: FnOnce(String) -> Router,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let app = build(base_url.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base_url
}

/// Calendly-shaped event with the given identifier, name and start time
pub fn event(identifier: &str, name: &str, start_time: &str) -> ScheduledEvent {
    ScheduledEvent::from_json(json!({
        "uri": format!("https://api.calendly.com/scheduled_events/{}", identifier),
        "name": name,
        "status": "active",
        "start_time": start_time,
        "end_time": start_time,
    }))
    .unwrap()
}

/// Assistant message carrying only text
pub fn text_reply(text: &str) -> ChatMessage {
    ChatMessage {
        role: Role::Assistant,
        content: Some(text.to_string()),
        tool_calls: None,
    }
}

/// Assistant message requesting the given (name, arguments) calls
pub fn tool_reply(calls: &[(&str, &str)]) -> ChatMessage {
    ChatMessage {
        role: Role::Assistant,
        content: None,
        tool_calls: Some(
            calls
                .iter()
                .enumerate()
                .map(|(i, (name, arguments))| ToolCall {
                    id: format!("call_{}", i),
                    kind: "function".to_string(),
                    function: FunctionCall {
                        name: name.to_string(),
                        arguments: arguments.to_string(),
                    },
                })
                .collect(),
        ),
    }
}

/// Mock implementation of the scheduling service
#[derive(Default)]
pub struct MockCalendar {
    events: Vec<ScheduledEvent>,
    fail_list: bool,
    pub list_calls: AtomicUsize,
    pub cancelled: Mutex<Vec<(String, String)>>,
}

impl MockCalendar {
    pub fn new(events: Vec<ScheduledEvent>) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_list: true,
            ..Default::default()
        }
    }

    pub fn cancelled(&self) -> Vec<(String, String)> {
        self.cancelled.lock().unwrap().clone()
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SchedulingService for MockCalendar {
    async fn list_events(&self) -> AppResult<Vec<ScheduledEvent>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list {
            return Err(scheduling_error("Failed to fetch events: HTTP 500"));
        }
        Ok(self.events.clone())
    }

    async fn cancel_event(&self, identifier: &str, reason: &str) -> AppResult<()> {
        self.cancelled
            .lock()
            .unwrap()
            .push((identifier.to_string(), reason.to_string()));
        Ok(())
    }
}

/// One recorded model call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<ChatMessage>,
    pub tool_names: Vec<String>,
}

type Responder = dyn Fn(&[ChatMessage], &[ToolDefinition]) -> AppResult<ChatMessage> + Send + Sync;

/// Chat model answering through a closure and recording every call
pub struct MockModel {
    responder: Box<Responder>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockModel {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&[ChatMessage], &[ToolDefinition]) -> AppResult<ChatMessage> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers from a fixed queue; errors once the queue runs dry
    pub fn scripted(replies: Vec<AppResult<ChatMessage>>) -> Self {
        let queue = Mutex::new(VecDeque::from(replies));
        Self::new(move |_, _| {
            queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(language_model_error("No scripted reply left")))
        })
    }

    /// Routes with `route_reply` and answers match questions with "Yes" when
    /// the candidate details contain `needle`
    pub fn calendar_assistant(route_reply: ChatMessage, needle: &'static str) -> Self {
        Self::new(move |messages, tools| {
            if !tools.is_empty() {
                return Ok(route_reply.clone());
            }
            Ok(text_reply(if candidate_details(messages).contains(needle) {
                "Yes"
            } else {
                "No"
            }))
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for MockModel {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> AppResult<ChatMessage> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages: messages.to_vec(),
            tool_names: tools.iter().map(|t| t.function.name.clone()).collect(),
        });
        (self.responder)(messages, tools)
    }
}

/// The "Event details: ..." text of a match question
pub fn candidate_details(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .filter(|m| m.role == Role::Assistant)
        .filter_map(|m| m.content.clone())
        .find(|c| c.starts_with("Event details:"))
        .unwrap_or_default()
}

/// Chat context over the two mocks
pub fn chat_context(calendar: Arc<MockCalendar>, model: Arc<MockModel>) -> ChatContext {
    ChatContext::new(test_config(), calendar, model)
}
