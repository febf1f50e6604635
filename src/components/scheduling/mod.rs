mod client;
pub mod models;

pub use client::CalendlyClient;
pub use models::ScheduledEvent;

use crate::error::AppResult;
use async_trait::async_trait;

/// Remote calendar operations the chat can trigger
#[async_trait]
pub trait SchedulingService: Send + Sync {
    /// Every scheduled event of the configured user, in listing order
    async fn list_events(&self) -> AppResult<Vec<ScheduledEvent>>;

    /// Cancel exactly the event with the given identifier
    async fn cancel_event(&self, identifier: &str, reason: &str) -> AppResult<()>;
}
