// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merging a foreign collection into the canonical one.

use std::collections::HashSet;

use journal_core::{Entry, JournalError};
use serde_json::Value;
use tracing::debug;

/// Result of [`merge`].
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub merged: Vec<Entry>,
    pub added_count: usize,
}

/// Append every `incoming` entry whose id is not yet present, in `incoming`
/// order. Existing entries win on id collisions; fields are never merged.
/// Entries with an empty id are skipped.
pub fn merge(existing: Vec<Entry>, incoming: Vec<Entry>) -> MergeOutcome {
    let mut seen: HashSet<String> = existing.iter().map(|e| e.id.clone()).collect();
    let mut merged = existing;
    let mut added_count = 0;
    for entry in incoming {
        if entry.id.is_empty() || !seen.insert(entry.id.clone()) {
            continue;
        }
        merged.push(entry);
        added_count += 1;
    }
    MergeOutcome {
        merged,
        added_count,
    }
}

/// Entries decoded from an import payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBatch {
    pub entries: Vec<Entry>,
    /// Array elements that were not usable entries.
    pub skipped: usize,
}

/// Decode an import payload: a JSON array of entries.
///
/// A payload that is not an array is a validation error. Elements that do not
/// decode as entries, or that lack an id, title or content, are skipped and
/// counted.
pub fn parse_import(json: &str) -> Result<ImportBatch, JournalError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| JournalError::Validation(format!("import payload is not JSON: {e}")))?;
    let Value::Array(items) = value else {
        return Err(JournalError::Validation(
            "import payload must be a JSON array of entries".to_string(),
        ));
    };

    let mut entries = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Entry>(item) {
            Ok(entry)
                if !entry.id.is_empty() && !entry.title.is_empty() && !entry.content.is_empty() =>
            {
                entries.push(entry);
            }
            Ok(_) => {
                debug!(index, "skipping import element with empty id, title or content");
                skipped += 1;
            }
            Err(error) => {
                debug!(index, %error, "skipping undecodable import element");
                skipped += 1;
            }
        }
    }
    Ok(ImportBatch { entries, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::tests::entry;

    fn ids(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn merge_appends_only_new_ids() {
        let existing = vec![entry("a", "a")];
        let incoming = vec![entry("a", "changed"), entry("b", "b")];
        let outcome = merge(existing, incoming.clone());
        assert_eq!(outcome.added_count, 1);
        assert_eq!(ids(&outcome.merged), ["a", "b"]);
        assert_eq!(outcome.merged[0].slug, "a");

        let again = merge(outcome.merged, incoming);
        assert_eq!(again.added_count, 0);
        assert_eq!(ids(&again.merged), ["a", "b"]);
    }

    #[test]
    fn merge_dedupes_within_incoming_and_skips_blank_ids() {
        let incoming = vec![entry("x", "1"), entry("", "2"), entry("x", "3"), entry("y", "4")];
        let outcome = merge(Vec::new(), incoming);
        assert_eq!(outcome.added_count, 2);
        assert_eq!(ids(&outcome.merged), ["x", "y"]);
        assert_eq!(outcome.merged[0].slug, "1");
    }

    #[test]
    fn import_rejects_non_arrays() {
        for payload in [r#"{"chats":[]}"#, "42", "not json"] {
            let err = parse_import(payload).unwrap_err();
            assert_eq!(err.kind(), journal_core::ErrorKind::Validation, "{payload}");
        }
    }

    #[test]
    fn import_skips_unusable_elements() {
        let good = serde_json::to_value(entry("a", "a")).unwrap();
        let mut untitled = entry("b", "b");
        untitled.title.clear();
        let untitled = serde_json::to_value(untitled).unwrap();
        let payload = serde_json::json!([good, untitled, {"id": "c"}, 7]).to_string();

        let batch = parse_import(&payload).unwrap();
        assert_eq!(ids(&batch.entries), ["a"]);
        assert_eq!(batch.skipped, 3);
    }
}
