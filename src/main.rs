use anyhow::Result;
use europeana_catalog::{config, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("europeana_catalog=info".parse()?),
        )
        .init();

    info!("Starting Europeana catalog service");

    let config = config::Config::from_env()?;
    info!(
        "Using Europeana API at {} (cache: {:?}, default locale: {})",
        config.europeana_api_url, config.cache, config.default_locale
    );

    server::serve(&config).await
}
