// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for prompt-journal.

use strum::{Display, EnumString};
use thiserror::Error;

/// The primary error type used across all journal adapter traits and services.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (store unreachable, write rejected, corrupt payload).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An entry identifier or slug is absent from the collection.
    #[error("{what} not found: {key}")]
    NotFound { what: &'static str, key: String },

    /// The supplied credential did not match the server-held secret.
    #[error("unauthorized")]
    Unauthorized,

    /// Malformed input (unknown bulk operation, non-array migration payload, slug clash).
    #[error("validation error: {0}")]
    Validation(String),

    /// A write was attempted against a stale collection version.
    #[error("version conflict on `{key}`: expected {expected}, found {actual}")]
    Conflict {
        key: String,
        expected: u64,
        actual: u64,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`JournalError`], for mapping onto status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Config,
    Storage,
    NotFound,
    Unauthorized,
    Validation,
    Conflict,
    Internal,
}

impl JournalError {
    /// Wrap any backend error as a storage failure.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage {
            source: Box::new(err),
        }
    }

    /// Shorthand for a missing entry looked up by id.
    pub fn entry_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            what: "entry",
            key: id.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Storage { .. } => ErrorKind::Storage,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(err: serde_json::Error) -> Self {
        Self::storage(err)
    }
}
