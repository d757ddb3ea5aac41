use crate::config::{AppConfig, StoreBackend};
use crate::services::db::{
    embedded_store::EmbeddedIssueStore, flat_store::FlatIssueStore,
    memory_store::InMemoryIssueStore, store::IssueStore, store::StorageVariant,
};
use anyhow::{Context, Result};
use mongodb::{Client, Database};
use std::sync::Arc;
use tracing::{info, warn};

/**
 * function to connect_db
 * only parses the uri, the driver connects lazily
 */
pub async fn connect_db(config: &AppConfig) -> Result<Database> {
    let uri = config
        .mongo_uri
        .as_deref()
        .context("You must set the ENV for MONGO_URI")?;

    let client = Client::with_uri_str(uri).await?;
    let db = client.database(&config.database_name);
    Ok(db)
}

/**
 * build the store the config asks for
 */
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn IssueStore>> {
    let store: Arc<dyn IssueStore> = match config.backend {
        StoreBackend::Memory => Arc::new(InMemoryIssueStore::new(config.variant)),
        StoreBackend::Mongo => {
            let db = connect_db(config).await?;
            match config.variant {
                StorageVariant::Flat => Arc::new(FlatIssueStore::new(&db)),
                StorageVariant::Embedded => {
                    let store = EmbeddedIssueStore::new(&db);
                    // the server may not be up yet, the index is created on a later start
                    if let Err(err) = store.ensure_indexes().await {
                        warn!("Could not create the project name index: {}", err);
                    }
                    Arc::new(store)
                }
            }
        }
    };

    info!(
        "Opened {:?} issue store with {:?} layout",
        config.backend, config.variant
    );
    Ok(store)
}
