use crate::commands::ChatContext;
use crate::components::language_model::{OpenAiClient, RetryPolicy, RetryingChatModel};
use crate::components::scheduling::CalendlyClient;
use crate::components::{ChatModel, SchedulingService};
use crate::config::Config;
use crate::error::Error;
use crate::shutdown;
use crate::utils::time::parse_timezone;
use crate::web::{self, AppState};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub async fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Wire the Calendly and OpenAI clients into the application state
pub async fn build_state(config: Arc<RwLock<Config>>) -> AppState {
    let (policy, timezone, locale) = {
        let config_read = config.read().await;
        (
            RetryPolicy::from_config(&config_read),
            parse_timezone(&config_read.timezone),
            config_read.bot_locale.clone(),
        )
    };

    let calendar: Arc<dyn SchedulingService> = Arc::new(CalendlyClient::new(Arc::clone(&config)));
    let model: Arc<dyn ChatModel> = Arc::new(RetryingChatModel::new(
        Arc::new(OpenAiClient::new(Arc::clone(&config))),
        policy,
    ));

    AppState {
        chat: Arc::new(ChatContext::new(config, calendar, model)),
        timezone,
        locale,
    }
}

/// Serve the chat page until a shutdown signal arrives
pub async fn start_server(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    let (bind_address, locale) = {
        let config_read = config.read().await;
        (config_read.bind_address.clone(), config_read.bot_locale.clone())
    };

    rust_i18n::set_locale(&locale);
    info!("Setting locale to {}", locale);

    let app = web::router(build_state(config).await);

    let listener = tokio::net::TcpListener::bind(bind_address.as_str())
        .await
        .map_err(Error::from)?;
    info!("Listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::wait_for_signal())
        .await
        .map_err(Error::from)?;

    info!("Server shut down");
    Ok(())
}
