// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch operations over a set of entry ids.
//!
//! [`apply`] mutates a [`Catalog`] in memory; the repository wraps it in a
//! single read and conditional write. Ids absent from the collection are
//! ignored, and counts report entries actually matched (a repeated id counts
//! once).

use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use journal_core::{Entry, JournalError};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::collection::Catalog;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BulkAction {
    Delete,
    Publish,
    Unpublish,
    List,
    Unlist,
    Export,
}

impl BulkAction {
    /// Parse an operation name, rejecting unknown names as a validation error.
    pub fn parse(name: &str) -> Result<Self, JournalError> {
        Self::from_str(name)
            .map_err(|_| JournalError::Validation(format!("invalid bulk operation: {name}")))
    }

    pub fn is_mutating(self) -> bool {
        self != BulkAction::Export
    }
}

/// Wire payload: `{ "type": "publish", "chatIds": ["..."] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOperation {
    #[serde(rename = "type")]
    pub action: BulkAction,
    pub chat_ids: Vec<String>,
}

impl BulkOperation {
    pub fn new(action: BulkAction, chat_ids: Vec<String>) -> Self {
        Self { action, chat_ids }
    }

    /// Decode a JSON payload. Any shape or operation-name problem is a
    /// validation error, never a storage error.
    pub fn from_json(json: &str) -> Result<Self, JournalError> {
        serde_json::from_str(json)
            .map_err(|e| JournalError::Validation(format!("invalid bulk operation: {e}")))
    }

    fn unique_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.chat_ids
            .iter()
            .map(String::as_str)
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BulkOutcome {
    Deleted { count: usize },
    Updated { count: usize },
    /// Matching entries in collection order. Nothing was modified.
    Exported { entries: Vec<Entry> },
}

impl BulkOutcome {
    /// Entries affected (or exported).
    pub fn count(&self) -> usize {
        match self {
            BulkOutcome::Deleted { count } | BulkOutcome::Updated { count } => *count,
            BulkOutcome::Exported { entries } => entries.len(),
        }
    }

    /// The exported subset as pretty-printed JSON, in the same shape as a
    /// full collection export. Only export outcomes carry entries.
    pub fn to_export_json(&self) -> Result<String, JournalError> {
        match self {
            BulkOutcome::Exported { entries } => Ok(serde_json::to_string_pretty(entries)?),
            other => Err(JournalError::Internal(format!(
                "bulk outcome with {} entries has nothing to export",
                other.count()
            ))),
        }
    }
}

/// Apply `operation` to `catalog`, stamping touched entries with `now`.
pub fn apply(catalog: &mut Catalog, operation: &BulkOperation, now: DateTime<Utc>) -> BulkOutcome {
    let ids = operation.unique_ids();
    let (published, unlisted) = match operation.action {
        BulkAction::Delete => {
            let wanted: HashSet<&str> = ids.into_iter().collect();
            let count = catalog.retain(|e| !wanted.contains(e.id.as_str()));
            return BulkOutcome::Deleted { count };
        }
        BulkAction::Export => {
            let wanted: HashSet<&str> = ids.into_iter().collect();
            let entries = catalog
                .entries()
                .iter()
                .filter(|e| wanted.contains(e.id.as_str()))
                .cloned()
                .collect();
            return BulkOutcome::Exported { entries };
        }
        BulkAction::Publish => (Some(true), None),
        BulkAction::Unpublish => (Some(false), None),
        BulkAction::List => (None, Some(false)),
        BulkAction::Unlist => (None, Some(true)),
    };

    let count = catalog.modify_each(&ids, |entry| {
        if let Some(value) = published {
            entry.is_published = value;
        }
        if let Some(value) = unlisted {
            entry.is_unlisted = value;
        }
        entry.updated_at = now;
    });
    BulkOutcome::Updated { count }
}
