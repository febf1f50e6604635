use crate::error::{config_error, env_error, AppResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Default Calendly API root
pub const DEFAULT_CALENDLY_BASE_URL: &str = "https://api.calendly.com";
/// Default OpenAI-compatible API root
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-0613";
/// Reason sent with every cancellation unless configured otherwise
pub const DEFAULT_CANCEL_REASON: &str = "Cancelled via event chat";
/// Optional file with non-secret overrides
pub const OVERRIDES_PATH: &str = "config/eventchat.toml";

/// Main configuration structure, created once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Calendly personal access token
    pub calendly_api_key: String,
    /// Calendly user URI the event listing is scoped to
    pub calendly_user_uri: String,
    /// Calendly API root
    pub calendly_base_url: String,
    /// Page size requested when listing events
    pub calendly_page_size: u32,
    /// OpenAI API key
    pub openai_api_key: String,
    /// OpenAI-compatible API root
    pub openai_base_url: String,
    /// Chat model used for routing and matching
    pub model: String,
    /// Reason attached to cancellations
    pub cancel_reason: String,
    /// Total attempts per language model request
    pub llm_max_attempts: u32,
    /// Upper bound for a single backoff wait, in seconds
    pub llm_backoff_max_secs: u64,
    /// Timezone used when showing event times
    pub timezone: String,
    /// Address the web interface listens on
    pub bind_address: String,
    /// Locale for user-facing text
    pub bot_locale: String,
}

/// Non-secret values that may be set in `config/eventchat.toml`
#[derive(Debug, Default, Deserialize)]
struct FileOverrides {
    calendly_base_url: Option<String>,
    calendly_page_size: Option<u32>,
    openai_base_url: Option<String>,
    model: Option<String>,
    cancel_reason: Option<String>,
    llm_max_attempts: Option<u32>,
    llm_backoff_max_secs: Option<u64>,
    timezone: Option<String>,
    bind_address: Option<String>,
    bot_locale: Option<String>,
}

impl Config {
    /// Build a configuration with default values around the three required credentials
    pub fn with_credentials(
        calendly_api_key: impl Into<String>,
        calendly_user_uri: impl Into<String>,
        openai_api_key: impl Into<String>,
    ) -> Self {
        Self {
            calendly_api_key: calendly_api_key.into(),
            calendly_user_uri: calendly_user_uri.into(),
            calendly_base_url: DEFAULT_CALENDLY_BASE_URL.to_string(),
            calendly_page_size: 100,
            openai_api_key: openai_api_key.into(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            cancel_reason: DEFAULT_CANCEL_REASON.to_string(),
            llm_max_attempts: 3,
            llm_backoff_max_secs: 40,
            timezone: "UTC".to_string(),
            bind_address: "127.0.0.1:3000".to_string(),
            bot_locale: "en".to_string(),
        }
    }

    /// Load configuration from environment and config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let calendly_api_key =
            env::var("CALENDLY_API_KEY").map_err(|_| env_error("CALENDLY_API_KEY"))?;
        let calendly_user_uri =
            env::var("CALENDLY_USER_URI").map_err(|_| env_error("CALENDLY_USER_URI"))?;
        let openai_api_key = env::var("OPENAI_API_KEY").map_err(|_| env_error("OPENAI_API_KEY"))?;

        let mut config = Self::with_credentials(calendly_api_key, calendly_user_uri, openai_api_key);

        if Path::new(OVERRIDES_PATH).exists() {
            let content = fs::read_to_string(OVERRIDES_PATH)?;
            config.apply_overrides(&content)?;
        }

        config.apply_env(|key| env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Apply overrides from TOML text
    pub fn apply_overrides(&mut self, content: &str) -> AppResult<()> {
        let file: FileOverrides = toml::from_str(content)?;

        if let Some(v) = file.calendly_base_url {
            self.calendly_base_url = v;
        }
        if let Some(v) = file.calendly_page_size {
            self.calendly_page_size = v;
        }
        if let Some(v) = file.openai_base_url {
            self.openai_base_url = v;
        }
        if let Some(v) = file.model {
            self.model = v;
        }
        if let Some(v) = file.cancel_reason {
            self.cancel_reason = v;
        }
        if let Some(v) = file.llm_max_attempts {
            self.llm_max_attempts = v;
        }
        if let Some(v) = file.llm_backoff_max_secs {
            self.llm_backoff_max_secs = v;
        }
        if let Some(v) = file.timezone {
            self.timezone = v;
        }
        if let Some(v) = file.bind_address {
            self.bind_address = v;
        }
        if let Some(v) = file.bot_locale {
            self.bot_locale = v;
        }

        Ok(())
    }

    /// Apply optional environment variables through a lookup function
    pub fn apply_env<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CALENDLY_BASE_URL") {
            self.calendly_base_url = v;
        }
        if let Some(v) = lookup("OPENAI_BASE_URL") {
            self.openai_base_url = v;
        }
        if let Some(v) = lookup("OPENAI_MODEL") {
            self.model = v;
        }
        if let Some(v) = lookup("CANCEL_REASON") {
            self.cancel_reason = v;
        }
        if let Some(v) = lookup("LLM_MAX_ATTEMPTS") {
            self.llm_max_attempts = v
                .parse()
                .map_err(|_| config_error("Invalid LLM_MAX_ATTEMPTS format"))?;
        }
        if let Some(v) = lookup("LLM_BACKOFF_MAX_SECS") {
            self.llm_backoff_max_secs = v
                .parse()
                .map_err(|_| config_error("Invalid LLM_BACKOFF_MAX_SECS format"))?;
        }
        if let Some(v) = lookup("TIMEZONE") {
            self.timezone = v;
        }
        if let Some(v) = lookup("BIND_ADDRESS") {
            self.bind_address = v;
        }
        if let Some(v) = lookup("BOT_LOCALE") {
            self.bot_locale = v;
        }

        Ok(())
    }

    /// Reject values that would make every turn fail
    pub fn validate(&self) -> AppResult<()> {
        if self.llm_max_attempts == 0 {
            return Err(config_error("llm_max_attempts must be at least 1"));
        }
        if self.calendly_page_size == 0 || self.calendly_page_size > 100 {
            return Err(config_error("calendly_page_size must be between 1 and 100"));
        }
        if self.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(config_error(&format!("Unknown timezone: {}", self.timezone)));
        }
        Ok(())
    }
}
