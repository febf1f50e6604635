use crate::components::language_model::{ChatMessage, ChatModel};
use crate::components::scheduling::{ScheduledEvent, SchedulingService};
use crate::config::Config;
use crate::error::AppResult;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

const MATCH_INSTRUCTION: &str = "User wants to match an event based on time.";
const MATCH_QUESTION: &str = "Is this the event that matches my requirement? Yes or no?";

/// Result of looking up an event from free text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(String),
    NotFound,
}

/// Result of cancelling an event described in free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "identifier", rename_all = "snake_case")]
pub enum CancelOutcome {
    Cancelled(String),
    NotFound,
}

/// Maps a description like "my 5pm" to one concrete remote event
#[derive(Clone)]
pub struct EventResolver {
    config: Arc<RwLock<Config>>,
    calendar: Arc<dyn SchedulingService>,
    model: Arc<dyn ChatModel>,
}

impl EventResolver {
    pub fn new(
        config: Arc<RwLock<Config>>,
        calendar: Arc<dyn SchedulingService>,
        model: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            config,
            calendar,
            model,
        }
    }

    /// Identifier of the first listed event the model accepts for the utterance
    pub async fn resolve(&self, utterance: &str) -> AppResult<Resolution> {
        let events = self.calendar.list_events().await?;
        if events.is_empty() {
            info!("No events to match against");
            return Ok(Resolution::NotFound);
        }

        for event in &events {
            if self.is_matching_event(utterance, event).await? {
                info!("Matched event {}", event.identifier);
                return Ok(Resolution::Found(event.identifier.clone()));
            }
        }

        info!("None of {} events matched", events.len());
        Ok(Resolution::NotFound)
    }

    /// Resolve the utterance and cancel the match, if there is one
    pub async fn cancel_by_utterance(&self, utterance: &str) -> AppResult<CancelOutcome> {
        let identifier = match self.resolve(utterance).await? {
            Resolution::Found(identifier) => identifier,
            Resolution::NotFound => return Ok(CancelOutcome::NotFound),
        };

        let reason = {
            let config_read = self.config.read().await;
            config_read.cancel_reason.clone()
        };

        self.calendar.cancel_event(&identifier, &reason).await?;
        Ok(CancelOutcome::Cancelled(identifier))
    }

    async fn is_matching_event(&self, utterance: &str, event: &ScheduledEvent) -> AppResult<bool> {
        let messages = [
            ChatMessage::system(MATCH_INSTRUCTION),
            ChatMessage::user(utterance),
            ChatMessage::assistant(format!("Event details: {}", event.details())),
            ChatMessage::user(MATCH_QUESTION),
        ];

        let reply = self.model.complete(&messages, &[]).await?;
        let answer = reply.content.unwrap_or_default();
        let matched = is_yes(&answer);
        debug!("Candidate {} answered {:?} -> {}", event.identifier, answer, matched);

        Ok(matched)
    }
}

/// True when any word of the answer is "yes", ignoring case and punctuation
fn is_yes(answer: &str) -> bool {
    answer
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .any(|word| word.eq_ignore_ascii_case("yes"))
}

#[cfg(test)]
mod tests {
    use super::is_yes;

    #[test]
    fn yes_answers() {
        assert!(is_yes("Yes"));
        assert!(is_yes("yes."));
        assert!(is_yes("  YES, this is the 5pm meeting"));
        assert!(is_yes("\"Yes\""));
        assert!(is_yes("Based on the event details, yes, this matches."));
        assert!(is_yes("The event is at 5pm, so yes."));
    }

    #[test]
    fn other_answers() {
        assert!(!is_yes("No"));
        assert!(!is_yes(""));
        assert!(!is_yes("Yesterday's event is different"));
        assert!(!is_yes("No, that one is yesterday's standup"));
        assert!(!is_yes("eyes on the 9am slot"));
    }
}
