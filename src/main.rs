use eventchat::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting event chat");

    // Load configuration
    let config = startup::load_config().await?;

    // Start the web interface
    startup::start_server(config).await
}
