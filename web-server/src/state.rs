use std::sync::Arc;

use database::Database;
use jokes_core::{AppConfig, CoreError, Dataset};
use tracing::info;

/// Everything a request handler needs, built once at startup.
pub struct AppContext {
    pub config: AppConfig,
    pub dataset: Dataset,
    pub database: Database,
}

impl AppContext {
    pub fn new(config: AppConfig, dataset: Dataset, database: Database) -> Arc<Self> {
        Arc::new(Self {
            config,
            dataset,
            database,
        })
    }

    /// Loads the dataset, opens the counter store and applies its schema.
    ///
    /// Invalid settings and storage failures abort; a bad dataset degrades to
    /// an empty feed.
    pub async fn bootstrap(config: AppConfig) -> Result<Arc<Self>, CoreError> {
        config.validate()?;

        info!("Loading dataset from {}", config.dataset_path.display());
        let dataset = Dataset::load_or_empty(&config.dataset_path);

        let mut database = Database::new(config.database_url.clone())
            .with_max_connections(config.max_connections);
        database.connect().await?;
        database.run_migrations().await?;

        Ok(Self::new(config, dataset, database))
    }
}
