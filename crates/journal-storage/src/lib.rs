// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Versioned key-value storage for prompt-journal.
//!
//! Provides a WAL-mode SQLite store with embedded migrations and a
//! single-writer model via `tokio-rusqlite`, plus an in-memory store with the
//! same optimistic-versioning contract.

pub mod database;
pub mod memory;
pub mod migrations;
pub mod sqlite;

use std::sync::Arc;

use journal_config::model::{StorageConfig, StoreBackend};
use journal_core::{JournalError, KvStore, PluginAdapter};
use tracing::info;

pub use database::Database;
pub use memory::InMemoryKvStore;
pub use sqlite::SqliteKvStore;

/// Build the store selected by `config.backend`.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn KvStore>, JournalError> {
    let store: Arc<dyn KvStore> = match config.backend {
        StoreBackend::Sqlite => Arc::new(SqliteKvStore::open(config).await?),
        StoreBackend::Memory => Arc::new(InMemoryKvStore::new()),
    };
    info!(backend = store.name(), "kv store ready");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend_is_selected() {
        let config = StorageConfig {
            backend: StoreBackend::Memory,
            ..StorageConfig::default()
        };
        let store = open_store(&config).await.unwrap();
        assert_eq!(store.name(), "memory");
    }
}
