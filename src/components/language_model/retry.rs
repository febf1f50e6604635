use super::models::{ChatMessage, ToolDefinition};
use super::ChatModel;
use crate::config::Config;
use crate::error::{AppResult, Error};
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Randomized exponential backoff with a bounded number of attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Ceiling of the first wait; doubles after every failure
    pub multiplier: Duration,
    /// Largest ceiling any wait may have
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            multiplier: Duration::from_secs(1),
            max_wait: Duration::from_secs(40),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.llm_max_attempts.max(1),
            max_wait: Duration::from_secs(config.llm_backoff_max_secs),
            ..Self::default()
        }
    }

    /// Policy that retries without sleeping
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            multiplier: Duration::ZERO,
            max_wait: Duration::ZERO,
        }
    }

    /// Upper bound of the wait after the given failed attempt (1-based)
    pub fn wait_ceiling(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.multiplier.saturating_mul(factor).min(self.max_wait)
    }

    /// Uniformly random wait in `[0, wait_ceiling(attempt)]`
    pub fn wait_after(&self, attempt: u32) -> Duration {
        let ceiling = self.wait_ceiling(attempt).as_secs_f64();
        if ceiling <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(rand::rng().random_range(0.0..=ceiling))
    }
}

/// Wraps a chat model and retries failed completions under a [`RetryPolicy`]
pub struct RetryingChatModel {
    inner: Arc<dyn ChatModel>,
    policy: RetryPolicy,
}

impl RetryingChatModel {
    pub fn new(inner: Arc<dyn ChatModel>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl ChatModel for RetryingChatModel {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> AppResult<ChatMessage> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.inner.complete(messages, tools).await {
                Ok(message) => return Ok(message),
                Err(e) if attempt >= max_attempts => {
                    return Err(Error::RetriesExhausted {
                        attempts: attempt,
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    let wait = self.policy.wait_after(attempt);
                    warn!(
                        "Chat completion attempt {}/{} failed: {}; retrying in {:?}",
                        attempt, max_attempts, e, wait
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
            }
        }
    }
}
