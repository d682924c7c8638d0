//! Background upkeep for the key-value store

use needledrop_storage::{MemoryStore, SqliteStore, StorageError};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Store whose expired entries are swept on a timer
#[derive(Debug, Clone)]
pub enum PurgeTarget {
    Memory(Arc<MemoryStore>),
    Sqlite(SqliteStore),
}

impl PurgeTarget {
    async fn purge(&self) -> Result<u64, StorageError> {
        match self {
            Self::Memory(store) => Ok(store.purge_expired().await as u64),
            Self::Sqlite(store) => store.purge_expired().await,
        }
    }
}

/// Periodically delete expired entries
pub fn spawn_purge_task(target: PurgeTarget, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            match target.purge().await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "Purged expired entries"),
                Err(e) => tracing::warn!(error = %e, "Failed to purge expired entries"),
            }
        }
    })
}
