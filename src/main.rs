use anyhow::Context;
use jokes_core::{AppConfig, ErrorExt};
use tracing_subscriber::EnvFilter;
use web_server::{AppContext, Server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting HR-approved ways to tell off dumb people at work");
    tracing::info!(
        dataset = %config.dataset_path.display(),
        database = %config.database_url,
        "Configuration loaded"
    );

    let ctx = AppContext::bootstrap(config)
        .await
        .map_err(|e| {
            e.log_error();
            e
        })
        .context("Failed to initialise application")?;

    Server::new(ctx).run().await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::Error::from(e)
    })
}
