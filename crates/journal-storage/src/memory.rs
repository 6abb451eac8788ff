// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-local KvStore, used for tests and ephemeral runs.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use journal_core::{
    AdapterType, HealthStatus, JournalError, KvStore, PluginAdapter, Versioned,
};

/// In-memory versioned store. The shard lock held by `entry` makes each
/// conditional write atomic.
#[derive(Debug, Default)]
pub struct InMemoryKvStore {
    entries: DashMap<String, Versioned<String>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PluginAdapter for InMemoryKvStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, JournalError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), JournalError> {
        Ok(())
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<Versioned<String>>, JournalError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn put(
        &self,
        key: &str,
        value: String,
        expected_version: u64,
    ) -> Result<u64, JournalError> {
        let conflict = |actual| JournalError::Conflict {
            key: key.to_string(),
            expected: expected_version,
            actual,
        };
        let next = expected_version + 1;
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut slot) => {
                let actual = slot.get().version;
                if actual != expected_version {
                    return Err(conflict(actual));
                }
                slot.insert(Versioned { value, version: next });
            }
            Entry::Vacant(slot) => {
                if expected_version != 0 {
                    return Err(conflict(0));
                }
                slot.insert(Versioned { value, version: next });
            }
        }
        Ok(next)
    }

    async fn remove(&self, key: &str) -> Result<bool, JournalError> {
        Ok(self.entries.remove(key).is_some())
    }
}
