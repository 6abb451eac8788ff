// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value store trait backing the catalog collection.

use async_trait::async_trait;

use crate::error::JournalError;
use crate::traits::adapter::PluginAdapter;
use crate::types::Versioned;

/// A flat key-value store with per-key optimistic versioning.
///
/// Every key carries a version that starts at 0 (absent) and increases by
/// one on each successful [`put`](KvStore::put). Writers pass the version
/// they read; a mismatch is rejected with [`JournalError::Conflict`] so a
/// lost race is never silently overwritten.
#[async_trait]
pub trait KvStore: PluginAdapter {
    /// Read a key. `None` means the key has never been written (version 0).
    async fn get(&self, key: &str) -> Result<Option<Versioned<String>>, JournalError>;

    /// Write `value` if the stored version still equals `expected_version`.
    ///
    /// Returns the new version on success.
    async fn put(
        &self,
        key: &str,
        value: String,
        expected_version: u64,
    ) -> Result<u64, JournalError>;

    /// Remove a key entirely. Returns `false` if it was absent.
    async fn remove(&self, key: &str) -> Result<bool, JournalError>;
}
