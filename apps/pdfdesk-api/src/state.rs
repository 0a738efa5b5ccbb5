//! Shared application state, injected into every handler.

use crate::config::Config;
use anyhow::Result;
use pdfdesk_store::{DeletionScheduler, LocalArtifactStore};
use std::sync::Arc;

pub struct AppState {
    pub store: Arc<LocalArtifactStore>,
    pub scheduler: DeletionScheduler,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self> {
        let store = Arc::new(
            LocalArtifactStore::new(config.storage_dir.clone(), config.retention()).await?,
        );
        let scheduler = DeletionScheduler::spawn(Arc::clone(&store));
        Ok(Self {
            store,
            scheduler,
            config,
        })
    }

    /// Persist output bytes and queue their deletion at the retention
    /// deadline. Returns the artifact name used in download URLs.
    pub async fn store_artifact(
        &self,
        bytes: &[u8],
        extension: &str,
    ) -> Result<String, pdfdesk_store::StoreError> {
        let name = self.store.store(bytes, extension).await?;
        self.scheduler.schedule(&name, self.config.retention());
        Ok(name)
    }
}
