use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(eventchat::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(eventchat::config))]
    Config(String),

    #[error("Scheduling service error: {0}")]
    #[diagnostic(code(eventchat::scheduling))]
    Scheduling(String),

    #[error("Language model error: {0}")]
    #[diagnostic(code(eventchat::language_model))]
    LanguageModel(String),

    #[error("Language model request failed after {attempts} attempts: {source}")]
    #[diagnostic(code(eventchat::retries_exhausted))]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    #[error(transparent)]
    #[diagnostic(code(eventchat::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(eventchat::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(eventchat::other))]
    Other(String),
}

impl Error {
    /// True for failures of either remote service (HTTP, network or malformed payload)
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::Scheduling(_) | Error::LanguageModel(_) | Error::RetriesExhausted { .. }
        )
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create scheduling service errors
pub fn scheduling_error(message: &str) -> Error {
    Error::Scheduling(message.to_string())
}

/// Helper to create language model errors
pub fn language_model_error(message: &str) -> Error {
    Error::LanguageModel(message.to_string())
}
