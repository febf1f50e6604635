use eventchat::components::language_model::RetryPolicy;
use eventchat::config::{Config, DEFAULT_CALENDLY_BASE_URL, DEFAULT_MODEL};
use eventchat::error::{env_error, scheduling_error, Error};
use eventchat::startup::build_state;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Smoke test to verify the defaults around the credentials
#[tokio::test]
async fn test_config_defaults() {
    let config = Config::with_credentials("key", "https://api.calendly.com/users/me", "sk");

    assert_eq!(config.calendly_base_url, DEFAULT_CALENDLY_BASE_URL);
    assert_eq!(config.model, DEFAULT_MODEL);
    assert_eq!(config.llm_max_attempts, 3);
    assert_eq!(config.timezone, "UTC");
    assert!(config.validate().is_ok());
}

/// The default retry policy matches the configured bounds
#[tokio::test]
async fn test_retry_policy_from_defaults() {
    let config = Config::with_credentials("key", "user", "sk");
    let policy = RetryPolicy::from_config(&config);

    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.wait_ceiling(1), Duration::from_secs(1));
    assert_eq!(policy.wait_ceiling(10), Duration::from_secs(40));
}

/// Application state can be wired without touching the network
#[tokio::test]
async fn test_build_state() {
    let mut config = Config::with_credentials("key", "user", "sk");
    config.timezone = "Europe/Helsinki".to_string();
    config.bot_locale = "fi".to_string();
    let state = build_state(Arc::new(RwLock::new(config))).await;

    assert_eq!(state.timezone, chrono_tz::Europe::Helsinki);
    assert_eq!(state.locale, "fi");
    assert_eq!(state.chat.config.read().await.model, DEFAULT_MODEL);
}

/// Remote failures are grouped apart from local ones
#[tokio::test]
async fn test_error_classification() {
    assert!(scheduling_error("HTTP 404").is_remote());
    assert!(Error::RetriesExhausted {
        attempts: 3,
        source: Box::new(Error::LanguageModel("down".to_string())),
    }
    .is_remote());
    assert!(!env_error("CALENDLY_API_KEY").is_remote());
    assert_eq!(
        env_error("CALENDLY_API_KEY").to_string(),
        "Environment error: Missing environment variable: CALENDLY_API_KEY"
    );
}
