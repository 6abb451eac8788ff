// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for prompt-journal.
//!
//! This crate provides the error type, the catalog domain types, and the
//! adapter traits implemented by storage and auth backends.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ErrorKind, JournalError};
pub use types::{
    AdapterType, Entry, EntryDraft, EntryPatch, HealthStatus, Message, ModelTag, PageType, Role,
    Versioned,
};

pub use traits::{AuthAdapter, KvStore, PluginAdapter};
