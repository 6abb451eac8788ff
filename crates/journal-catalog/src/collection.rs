// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory form of the stored collection.
//!
//! Entries live in an ordered arena (`Vec<Entry>`, collection order is
//! insertion order) with side indexes from id and slug to arena position.
//! Every structural change rebuilds the indexes, so they can never point at
//! the wrong entry.

use std::collections::HashMap;

use journal_core::{Entry, JournalError};

/// A loaded collection with O(1) id and slug lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<Entry>,
    by_id: HashMap<String, usize>,
    by_slug: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from entries in collection order. Duplicate ids resolve to the
    /// first occurrence.
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        let mut catalog = Self {
            entries,
            ..Self::default()
        };
        catalog.reindex();
        catalog
    }

    /// Decode the stored JSON array.
    pub fn from_json(json: &str) -> Result<Self, JournalError> {
        let entries: Vec<Entry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    /// Encode as the stored JSON array.
    pub fn to_json(&self) -> Result<String, JournalError> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    /// First entry in collection order carrying `slug`.
    pub fn find_by_slug(&self, slug: &str) -> Option<&Entry> {
        self.by_slug.get(slug).map(|&i| &self.entries[i])
    }

    /// Whether a non-empty `slug` is held by any entry other than `except_id`.
    pub fn slug_taken(&self, slug: &str, except_id: Option<&str>) -> bool {
        !slug.is_empty()
            && self
                .entries
                .iter()
                .any(|e| e.slug == slug && Some(e.id.as_str()) != except_id)
    }

    /// Append an entry. Returns `false`, leaving the catalog unchanged, when
    /// the id is already present.
    pub fn push(&mut self, entry: Entry) -> bool {
        if self.contains(&entry.id) {
            return false;
        }
        let index = self.entries.len();
        self.by_id.insert(entry.id.clone(), index);
        if !entry.slug.is_empty() {
            self.by_slug.entry(entry.slug.clone()).or_insert(index);
        }
        self.entries.push(entry);
        true
    }

    /// Apply `f` to the entry with `id`, keeping the slug index current.
    pub fn modify<R>(&mut self, id: &str, f: impl FnOnce(&mut Entry) -> R) -> Option<R> {
        let index = *self.by_id.get(id)?;
        let entry = &mut self.entries[index];
        let old_slug = entry.slug.clone();
        let result = f(entry);
        if entry.slug != old_slug || entry.id != id {
            self.reindex();
        }
        Some(result)
    }

    /// Apply `f` to every entry whose id is in `ids`, returning how many matched.
    pub fn modify_each(&mut self, ids: &[&str], mut f: impl FnMut(&mut Entry)) -> usize {
        let mut matched = 0;
        for id in ids {
            if self.modify(id, &mut f).is_some() {
                matched += 1;
            }
        }
        matched
    }

    pub fn remove(&mut self, id: &str) -> Option<Entry> {
        let index = *self.by_id.get(id)?;
        let entry = self.entries.remove(index);
        self.reindex();
        Some(entry)
    }

    /// Keep only entries for which `keep` is true; returns how many were removed.
    pub fn retain(&mut self, keep: impl FnMut(&Entry) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(keep);
        let removed = before - self.entries.len();
        if removed > 0 {
            self.reindex();
        }
        removed
    }

    fn reindex(&mut self) {
        self.by_id.clear();
        self.by_slug.clear();
        for (index, entry) in self.entries.iter().enumerate() {
            self.by_id.entry(entry.id.clone()).or_insert(index);
            if !entry.slug.is_empty() {
                self.by_slug.entry(entry.slug.clone()).or_insert(index);
            }
        }
    }
}

/// A catalog together with the store version it was read at.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub catalog: Catalog,
    pub version: u64,
}
