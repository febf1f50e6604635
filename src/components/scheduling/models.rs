use crate::error::{scheduling_error, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Calendly scheduled event, as much of it as we read
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledEvent {
    /// Trailing path segment of `uri`
    pub identifier: String,
    pub uri: String,
    pub name: Option<String>,
    pub status: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(skip)]
    raw: Value,
}

impl ScheduledEvent {
    /// Build from one element of the remote `collection` array
    pub fn from_json(raw: Value) -> AppResult<Self> {
        let uri = raw
            .get("uri")
            .and_then(|u| u.as_str())
            .ok_or_else(|| scheduling_error("Event without uri in response"))?
            .to_string();

        let identifier = identifier_from_uri(&uri)
            .ok_or_else(|| scheduling_error(&format!("Cannot derive event identifier from {}", uri)))?;

        let text = |key: &str| raw.get(key).and_then(|v| v.as_str()).map(|s| s.to_string());

        Ok(Self {
            identifier,
            name: text("name"),
            status: text("status"),
            start_time: text("start_time"),
            end_time: text("end_time"),
            uri,
            raw,
        })
    }

    /// The event exactly as the remote service returned it
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Details rendered as JSON text for the match prompt
    pub fn details(&self) -> String {
        self.raw.to_string()
    }
}

/// Extract the last non-empty path segment of an event URI
pub fn identifier_from_uri(uri: &str) -> Option<String> {
    let url = Url::parse(uri).ok()?;
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(|segment| segment.to_string())
}

/// One page of `GET /scheduled_events`
#[derive(Debug, Deserialize)]
pub(crate) struct EventPage {
    pub collection: Vec<Value>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Pagination {
    #[serde(default)]
    pub next_page: Option<String>,
}
