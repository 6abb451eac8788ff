// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the KvStore trait.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use tracing::{debug, warn};

use journal_config::model::StorageConfig;
use journal_core::{
    AdapterType, HealthStatus, JournalError, KvStore, PluginAdapter, Versioned,
};

use crate::database::{map_tr_err, Database};

/// Result of a conditional write, decided on the database thread.
enum PutOutcome {
    Written(u64),
    Conflict { actual: u64 },
}

fn to_version(raw: i64) -> u64 {
    u64::try_from(raw).unwrap_or_default()
}

/// SQLite-backed versioned key-value store.
///
/// The version check and the write run inside one transaction on the
/// connection's single thread, so concurrent writers cannot interleave.
pub struct SqliteKvStore {
    db: Database,
}

impl SqliteKvStore {
    /// Open the database named by `config` and run migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, JournalError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite store initialized");
        Ok(Self { db })
    }

    pub fn from_database(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PluginAdapter for SqliteKvStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, JournalError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), JournalError> {
        self.db.checkpoint().await
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<Versioned<String>>, JournalError> {
        let key = key.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<Option<Versioned<String>>, rusqlite::Error> {
                conn.query_row(
                    "SELECT value, version FROM kv_store WHERE key = ?1",
                    params![key],
                    |row| {
                        Ok(Versioned {
                            value: row.get(0)?,
                            version: to_version(row.get(1)?),
                        })
                    },
                )
                .optional()
            })
            .await
            .map_err(map_tr_err)
    }

    async fn put(
        &self,
        key: &str,
        value: String,
        expected_version: u64,
    ) -> Result<u64, JournalError> {
        let owned_key = key.to_string();
        let updated_at = Utc::now().to_rfc3339();
        let outcome = self
            .db
            .connection()
            .call(move |conn| -> Result<PutOutcome, rusqlite::Error> {
                let tx = conn.transaction()?;
                let actual = tx
                    .query_row(
                        "SELECT version FROM kv_store WHERE key = ?1",
                        params![owned_key],
                        |row| row.get::<_, i64>(0),
                    )
                    .optional()?
                    .map_or(0, to_version);
                if actual != expected_version {
                    return Ok(PutOutcome::Conflict { actual });
                }

                let next = expected_version + 1;
                tx.execute(
                    "INSERT INTO kv_store (key, value, version, updated_at)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        version = excluded.version,
                        updated_at = excluded.updated_at",
                    params![owned_key, value, i64::try_from(next).unwrap_or(i64::MAX), updated_at],
                )?;
                tx.commit()?;
                Ok(PutOutcome::Written(next))
            })
            .await
            .map_err(map_tr_err)?;

        match outcome {
            PutOutcome::Written(version) => {
                debug!(key, version, "kv write committed");
                Ok(version)
            }
            PutOutcome::Conflict { actual } => {
                warn!(key, expected = expected_version, actual, "kv write rejected: stale version");
                Err(JournalError::Conflict {
                    key: key.to_string(),
                    expected: expected_version,
                    actual,
                })
            }
        }
    }

    async fn remove(&self, key: &str) -> Result<bool, JournalError> {
        let key = key.to_string();
        let removed = self
            .db
            .connection()
            .call(move |conn| -> Result<usize, rusqlite::Error> {
                conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            })
            .await
            .map_err(map_tr_err)?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn memory_store() -> SqliteKvStore {
        SqliteKvStore::from_database(Database::open_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn implements_plugin_adapter() {
        let store = memory_store().await;
        assert_eq!(store.name(), "sqlite");
        assert_eq!(store.adapter_type(), AdapterType::Store);
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn absent_key_reads_none() {
        let store = memory_store().await;
        assert!(store.get("missing").await.unwrap().is_none());
        assert!(!store.remove("missing").await.unwrap());
    }

    #[tokio::test]
    async fn put_increments_version() {
        let store = memory_store().await;
        assert_eq!(store.put("k", "a".into(), 0).await.unwrap(), 1);
        assert_eq!(store.put("k", "b".into(), 1).await.unwrap(), 2);
        let stored = store.get("k").await.unwrap().unwrap();
        assert_eq!(stored, Versioned { value: "b".into(), version: 2 });
    }

    #[tokio::test]
    async fn stale_put_is_rejected_and_value_kept() {
        let store = memory_store().await;
        store.put("k", "first".into(), 0).await.unwrap();
        let err = store.put("k", "second".into(), 0).await.unwrap_err();
        match err {
            JournalError::Conflict { expected, actual, .. } => {
                assert_eq!(expected, 0);
                assert_eq!(actual, 1);
            }
            other => panic!("expected conflict, got {other:?}"),
        }
        assert_eq!(store.get("k").await.unwrap().unwrap().value, "first");
    }

    #[tokio::test]
    async fn remove_resets_version() {
        let store = memory_store().await;
        store.put("k", "v".into(), 0).await.unwrap();
        assert!(store.remove("k").await.unwrap());
        assert!(store.get("k").await.unwrap().is_none());
        assert_eq!(store.put("k", "again".into(), 0).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("kv.db").to_string_lossy().into_owned(),
            ..StorageConfig::default()
        };
        {
            let store = SqliteKvStore::open(&config).await.unwrap();
            store.put("k", "persisted".into(), 0).await.unwrap();
            store.shutdown().await.unwrap();
        }
        let store = SqliteKvStore::open(&config).await.unwrap();
        let stored = store.get("k").await.unwrap().unwrap();
        assert_eq!(stored.value, "persisted");
        assert_eq!(stored.version, 1);
    }
}
