//! Application state and initialization
//!
//! All services are constructed here once at startup and made available
//! to the HTTP handlers through AppState.

use std::sync::Arc;

use crate::config::Config;
use crate::database::{create_pool, Repository};
use crate::error::Result;
use crate::services::{ContentService, DocumentsService};
use crate::storage::UploadStore;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub content: ContentService,
    pub documents: DocumentsService,
}

impl AppState {
    /// Create directories, open the database (running migrations), and
    /// wire up the services.
    pub async fn initialize(config: Config) -> Result<Self> {
        tracing::info!("Initializing application");
        tracing::info!("Data directory: {:?}", config.data_dir);

        tokio::fs::create_dir_all(&config.data_dir).await?;

        let pool = create_pool(&config.database_path).await?;
        let repo = Repository::new(pool);

        let store = UploadStore::new(config.uploads_dir.clone());
        store.initialize().await?;

        let config = Arc::new(config);
        let state = Self {
            content: ContentService::new(repo.clone()),
            documents: DocumentsService::new(repo, store, config.clone()),
            config,
        };

        tracing::info!("Application initialized successfully");
        Ok(state)
    }
}
