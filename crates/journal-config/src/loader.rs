// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./journal.toml` > `~/.config/prompt-journal/journal.toml` >
//! `/etc/prompt-journal/journal.toml`, with `JOURNAL_*` environment overrides
//! on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::JournalConfig;

/// File name searched for in each config directory.
pub const CONFIG_FILE_NAME: &str = "journal.toml";

/// System-wide config location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/prompt-journal/journal.toml";

/// The per-user config location, if the platform has a config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("prompt-journal").join(CONFIG_FILE_NAME))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/prompt-journal/journal.toml`
/// 3. `~/.config/prompt-journal/journal.toml`
/// 4. `./journal.toml`
/// 5. `JOURNAL_*` environment variables
pub fn load_config() -> Result<JournalConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<JournalConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(JournalConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<JournalConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(JournalConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(JournalConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// Map `JOURNAL_<SECTION>_<KEY>` onto `<section>.<key>`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `JOURNAL_STORAGE_COLLECTION_KEY` lands on `storage.collection_key`.
fn env_provider() -> Env {
    Env::prefixed("JOURNAL_").map(|key| {
        let key_str = key.as_str();
        let mapped = ["app", "storage", "catalog", "security"]
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| key_str.to_string());
        mapped.into()
    })
}
