use crate::components::language_model::ToolDefinition;
use serde_json::json;

pub const LIST_EVENTS: &str = "list_events";
pub const CANCEL_EVENT: &str = "cancel_event";

/// The fixed set of actions offered to the model
#[derive(Debug, Clone, PartialEq)]
pub struct ActionMenu {
    tools: Vec<ToolDefinition>,
}

impl ActionMenu {
    /// `list_events` and `cancel_event`
    pub fn calendar() -> Self {
        let list_events = ToolDefinition::function(LIST_EVENTS, "List scheduled events", None);
        let cancel_event = ToolDefinition::function(
            CANCEL_EVENT,
            "Cancel a scheduled event",
            Some(json!({
                "type": "object",
                "properties": {
                    "user_input": {
                        "type": "string",
                        "description": "cancel one event that matches user input description",
                    }
                },
                "required": ["user_input"]
            })),
        );

        Self {
            tools: vec![list_events, cancel_event],
        }
    }

    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }
}

impl Default for ActionMenu {
    fn default() -> Self {
        Self::calendar()
    }
}
