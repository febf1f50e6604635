use super::models::{EventPage, ScheduledEvent};
use super::SchedulingService;
use crate::config::Config;
use crate::error::{scheduling_error, AppResult};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

/// Safety stop for `next_page` chains
const MAX_PAGES: usize = 50;

/// HTTP client for the Calendly scheduled events API
#[derive(Clone)]
pub struct CalendlyClient {
    config: Arc<RwLock<Config>>,
    client: Client,
}

impl CalendlyClient {
    /// Create a new client sharing the application config
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Build `{base}/scheduled_events/...` with each segment percent-encoded
    fn endpoint(base_url: &str, segments: &[&str]) -> AppResult<Url> {
        let mut url = Url::parse(base_url)
            .map_err(|e| scheduling_error(&format!("Failed to parse URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| scheduling_error(&format!("Base URL cannot have a path: {}", base_url)))?
            .pop_if_empty()
            .push("scheduled_events")
            .extend(segments);
        Ok(url)
    }

    /// Turn a non-success status into a scheduling error carrying the body
    async fn check_status(response: Response, action: &str) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        Err(scheduling_error(&format!(
            "Failed to {}: HTTP {} - {}",
            action, status, error_body
        )))
    }
}

#[async_trait]
impl SchedulingService for CalendlyClient {
    async fn list_events(&self) -> AppResult<Vec<ScheduledEvent>> {
        let (base_url, user_uri, api_key, page_size) = {
            let config_read = self.config.read().await;
            (
                config_read.calendly_base_url.clone(),
                config_read.calendly_user_uri.clone(),
                config_read.calendly_api_key.clone(),
                config_read.calendly_page_size,
            )
        };

        let mut url = Self::endpoint(&base_url, &[])?;
        url.query_pairs_mut()
            .append_pair("user", &user_uri)
            .append_pair("count", &page_size.to_string());

        let mut events = Vec::new();
        let mut next = Some(url);
        let mut pages = 0;

        while let Some(page_url) = next.take() {
            pages += 1;
            if pages > MAX_PAGES {
                return Err(scheduling_error("Too many pages in event listing"));
            }
            debug!("Fetching events page {}", pages);

            let response = self
                .client
                .get(page_url)
                .bearer_auth(&api_key)
                .header("Content-Type", "application/json")
                .send()
                .await
                .map_err(|e| scheduling_error(&format!("Failed to fetch events: {}", e)))?;

            let page: EventPage = Self::check_status(response, "fetch events")
                .await?
                .json()
                .await
                .map_err(|e| scheduling_error(&format!("Failed to parse events response: {}", e)))?;

            for raw in page.collection {
                events.push(ScheduledEvent::from_json(raw)?);
            }

            next = page
                .pagination
                .and_then(|p| p.next_page)
                .map(|link| {
                    Url::parse(&link)
                        .map_err(|e| scheduling_error(&format!("Invalid next_page link: {}", e)))
                })
                .transpose()?;
        }

        info!("Fetched {} scheduled events", events.len());
        Ok(events)
    }

    async fn cancel_event(&self, identifier: &str, reason: &str) -> AppResult<()> {
        let (base_url, api_key) = {
            let config_read = self.config.read().await;
            (
                config_read.calendly_base_url.clone(),
                config_read.calendly_api_key.clone(),
            )
        };

        let url = Self::endpoint(&base_url, &[identifier, "cancellation"])?;

        let response = self
            .client
            .post(url)
            .bearer_auth(&api_key)
            .json(&json!({ "reason": reason }))
            .send()
            .await
            .map_err(|e| scheduling_error(&format!("Failed to cancel event: {}", e)))?;

        Self::check_status(response, "cancel event").await?;

        info!("Cancelled event {}", identifier);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_encoded_segments() {
        let url = CalendlyClient::endpoint("https://api.calendly.com", &["a b", "cancellation"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.calendly.com/scheduled_events/a%20b/cancellation"
        );
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let url = CalendlyClient::endpoint("http://localhost:8080/mock/", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/mock/scheduled_events");
    }
}
