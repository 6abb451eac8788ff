// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Top-level journal configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct JournalConfig {
    /// Application identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// Key-value store backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Catalog write and listing policy.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Admin credential settings.
    #[serde(default)]
    pub security: SecurityConfig,
}

/// Application identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name used in log lines.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "prompt-journal".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Which key-value store implementation to open.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StoreBackend {
    /// Durable SQLite file.
    #[default]
    Sqlite,
    /// Process-local map; contents vanish on exit.
    Memory,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    /// The single key holding the serialized collection.
    #[serde(default = "default_collection_key")]
    pub collection_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
            collection_key: default_collection_key(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("prompt-journal").join("journal.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("journal.db"))
        .display()
        .to_string()
}

fn default_wal_mode() -> bool {
    true
}

fn default_collection_key() -> String {
    "prompt-journal:chats".to_string()
}

/// What to do when a write would give two entries the same slug.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SlugPolicy {
    /// Refuse the write with a validation error.
    #[default]
    Reject,
    /// Accept it; slug lookups return the first match.
    Allow,
}

/// Catalog policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    #[serde(default)]
    pub slug_policy: SlugPolicy,

    /// Characters of preview text kept in an entry's excerpt.
    #[serde(default = "default_excerpt_length")]
    pub excerpt_length: usize,

    /// Default size of the popular listing.
    #[serde(default = "default_popular_limit")]
    pub popular_limit: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            slug_policy: SlugPolicy::default(),
            excerpt_length: default_excerpt_length(),
            popular_limit: default_popular_limit(),
        }
    }
}

fn default_excerpt_length() -> usize {
    150
}

fn default_popular_limit() -> usize {
    10
}

/// Admin credential configuration.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityConfig {
    /// Shared secret compared against the credential on every mutating call.
    /// `None` rejects all mutations. Wrapped in a `SecretString` as soon as
    /// it leaves the config layer.
    #[serde(default, serialize_with = "serialize_redacted")]
    pub admin_password: Option<String>,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Secrets never round-trip through serialization.
fn serialize_redacted<S: serde::Serializer>(
    value: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(_) => serializer.serialize_some("[REDACTED]"),
        None => serializer.serialize_none(),
    }
}
