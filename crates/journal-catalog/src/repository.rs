// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CRUD over the catalog collection stored under one key.
//!
//! Every mutation is a read of the whole collection, an in-memory change, and
//! a conditional write against the version that was read. A concurrent writer
//! that committed in between turns the write into [`JournalError::Conflict`];
//! nothing is retried or merged.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use journal_config::{JournalConfig, SlugPolicy};
use journal_core::{Entry, EntryDraft, EntryPatch, JournalError, KvStore, Versioned};
use journal_transcript::{calculate_reading_time, generate_excerpt_with_limit, generate_slug};
use tracing::{debug, info};
use uuid::Uuid;

use crate::bulk::{self, BulkOperation, BulkOutcome};
use crate::collection::{Catalog, Snapshot};
use crate::migration::{self, MergeOutcome};
use crate::search::{self, SearchFilters};

/// Default storage key for the collection.
pub const DEFAULT_COLLECTION_KEY: &str = "prompt-journal:chats";

/// How an entry is addressed by [`ChatRepository::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryLookup<'a> {
    Id(&'a str),
    Slug(&'a str),
}

#[derive(Debug, Clone)]
pub struct RepositoryOptions {
    pub collection_key: String,
    pub slug_policy: SlugPolicy,
    pub excerpt_length: usize,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            collection_key: DEFAULT_COLLECTION_KEY.to_string(),
            slug_policy: SlugPolicy::default(),
            excerpt_length: journal_transcript::codec::DEFAULT_EXCERPT_LENGTH,
        }
    }
}

impl RepositoryOptions {
    pub fn from_config(config: &JournalConfig) -> Self {
        Self {
            collection_key: config.storage.collection_key.clone(),
            slug_policy: config.catalog.slug_policy,
            excerpt_length: config.catalog.excerpt_length,
        }
    }
}

/// Outcome of a migration or import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    pub added: usize,
    /// Import elements that were not usable entries. Always 0 for `migrate`.
    pub skipped: usize,
    /// Collection size after the merge.
    pub total: usize,
}

pub struct ChatRepository {
    store: Arc<dyn KvStore>,
    options: RepositoryOptions,
}

impl ChatRepository {
    pub fn new(store: Arc<dyn KvStore>, options: RepositoryOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    pub fn options(&self) -> &RepositoryOptions {
        &self.options
    }

    /// Read the collection and the version it was stored at. An absent key is
    /// an empty collection at version 0.
    pub async fn snapshot(&self) -> Result<Snapshot, JournalError> {
        match self.store.get(&self.options.collection_key).await? {
            Some(Versioned { value, version }) => Ok(Snapshot {
                catalog: Catalog::from_json(&value)?,
                version,
            }),
            None => Ok(Snapshot {
                catalog: Catalog::new(),
                version: 0,
            }),
        }
    }

    /// Write `catalog` back, provided the stored version is still `base_version`.
    async fn commit(&self, catalog: &Catalog, base_version: u64) -> Result<u64, JournalError> {
        let json = catalog.to_json()?;
        let version = self
            .store
            .put(&self.options.collection_key, json, base_version)
            .await?;
        debug!(version, entries = catalog.len(), "collection committed");
        Ok(version)
    }

    /// Every entry, in collection order.
    pub async fn list_all(&self) -> Result<Vec<Entry>, JournalError> {
        Ok(self.snapshot().await?.catalog.into_entries())
    }

    /// Every published entry, listed or not.
    pub async fn list_published(&self) -> Result<Vec<Entry>, JournalError> {
        let mut entries = self.list_all().await?;
        entries.retain(|e| e.is_published);
        Ok(entries)
    }

    pub async fn get(&self, lookup: EntryLookup<'_>) -> Result<Option<Entry>, JournalError> {
        let catalog = self.snapshot().await?.catalog;
        let found = match lookup {
            EntryLookup::Id(id) => catalog.get(id),
            EntryLookup::Slug(slug) => catalog.find_by_slug(slug),
        };
        Ok(found.cloned())
    }

    /// The first published entry with `slug`. Unlisted entries are reachable here.
    pub async fn get_published_by_slug(&self, slug: &str) -> Result<Option<Entry>, JournalError> {
        let catalog = self.snapshot().await?.catalog;
        Ok(catalog
            .entries()
            .iter()
            .find(|e| e.slug == slug && e.is_published)
            .cloned())
    }

    pub async fn create(&self, draft: EntryDraft) -> Result<Entry, JournalError> {
        let Snapshot {
            mut catalog,
            version,
        } = self.snapshot().await?;

        let slug = generate_slug(&draft.title);
        self.check_slug(&catalog, &slug, None)?;

        let now = Utc::now();
        let mut entry = Entry {
            id: Uuid::new_v4().to_string(),
            slug,
            title: draft.title,
            content: draft.content,
            model_tag: draft.model_tag,
            page_type: draft.page_type,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
            is_published: draft.is_published,
            is_unlisted: draft.is_unlisted,
            is_draft: draft.is_draft,
            excerpt: String::new(),
            views: 0,
            reading_time: 1,
        };
        self.derive_from_content(&mut entry);

        if !catalog.push(entry.clone()) {
            return Err(JournalError::Internal(format!(
                "generated id already present: {}",
                entry.id
            )));
        }
        self.commit(&catalog, version).await?;
        info!(id = %entry.id, slug = %entry.slug, "entry created");
        Ok(entry)
    }

    /// Merge `patch` onto the entry with `id`.
    ///
    /// `updatedAt` is always refreshed. A new title re-derives the slug; new
    /// content re-derives the excerpt and reading time.
    pub async fn update(&self, id: &str, patch: EntryPatch) -> Result<Entry, JournalError> {
        let Snapshot {
            mut catalog,
            version,
        } = self.snapshot().await?;
        if !catalog.contains(id) {
            return Err(JournalError::entry_not_found(id));
        }

        let new_slug = patch.title.as_deref().map(generate_slug);
        if let Some(slug) = &new_slug {
            self.check_slug(&catalog, slug, Some(id))?;
        }

        let now = Utc::now();
        let updated = catalog
            .modify(id, |entry| {
                self.apply_patch(entry, patch, new_slug, now);
                entry.clone()
            })
            .ok_or_else(|| JournalError::entry_not_found(id))?;

        self.commit(&catalog, version).await?;
        info!(id = %updated.id, slug = %updated.slug, "entry updated");
        Ok(updated)
    }

    /// Remove the entry with `id`. Returns `false`, without writing, when absent.
    pub async fn delete(&self, id: &str) -> Result<bool, JournalError> {
        let Snapshot {
            mut catalog,
            version,
        } = self.snapshot().await?;
        if catalog.remove(id).is_none() {
            debug!(id, "delete ignored: no such entry");
            return Ok(false);
        }
        self.commit(&catalog, version).await?;
        info!(id, "entry deleted");
        Ok(true)
    }

    /// Count one view of the published entry with `slug`. Returns the new
    /// count. Like every other write, this refreshes `updatedAt`.
    pub async fn record_view(&self, slug: &str) -> Result<Option<u64>, JournalError> {
        let Snapshot {
            mut catalog,
            version,
        } = self.snapshot().await?;
        let Some(id) = catalog
            .entries()
            .iter()
            .find(|e| e.slug == slug && e.is_published)
            .map(|e| e.id.clone())
        else {
            return Ok(None);
        };
        let now = Utc::now();
        let views = catalog.modify(&id, |entry| {
            entry.views += 1;
            entry.updated_at = now;
            entry.views
        });
        self.commit(&catalog, version).await?;
        debug!(slug, ?views, "view recorded");
        Ok(views)
    }

    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<Entry>, JournalError> {
        let catalog = self.snapshot().await?.catalog;
        Ok(search::search(catalog.entries(), filters)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn all_tags(&self) -> Result<Vec<String>, JournalError> {
        Ok(search::get_all_tags(self.snapshot().await?.catalog.entries()))
    }

    pub async fn popular(&self, limit: usize) -> Result<Vec<Entry>, JournalError> {
        let catalog = self.snapshot().await?.catalog;
        Ok(search::popular(catalog.entries(), limit)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Apply a bulk operation in one read and (for mutating operations that
    /// matched anything) one write.
    pub async fn apply_bulk(&self, operation: &BulkOperation) -> Result<BulkOutcome, JournalError> {
        let Snapshot {
            mut catalog,
            version,
        } = self.snapshot().await?;
        let outcome = bulk::apply(&mut catalog, operation, Utc::now());
        if operation.action.is_mutating() && outcome.count() > 0 {
            self.commit(&catalog, version).await?;
        }
        info!(
            action = %operation.action,
            requested = operation.chat_ids.len(),
            matched = outcome.count(),
            "bulk operation applied"
        );
        Ok(outcome)
    }

    /// Merge a foreign collection by id. Existing entries win.
    pub async fn migrate(&self, incoming: Vec<Entry>) -> Result<MigrationReport, JournalError> {
        let Snapshot { catalog, version } = self.snapshot().await?;
        let MergeOutcome {
            merged,
            added_count,
        } = migration::merge(catalog.into_entries(), incoming);
        let merged = Catalog::from_entries(merged);
        if added_count > 0 {
            self.commit(&merged, version).await?;
        }
        info!(added = added_count, total = merged.len(), "collection migrated");
        Ok(MigrationReport {
            added: added_count,
            skipped: 0,
            total: merged.len(),
        })
    }

    /// Import a JSON array of entries through [`migrate`](Self::migrate).
    pub async fn import_json(&self, json: &str) -> Result<MigrationReport, JournalError> {
        let batch = migration::parse_import(json)?;
        let report = self.migrate(batch.entries).await?;
        Ok(MigrationReport {
            skipped: batch.skipped,
            ..report
        })
    }

    /// The whole collection as pretty-printed JSON.
    pub async fn export_all(&self) -> Result<String, JournalError> {
        let entries = self.list_all().await?;
        Ok(serde_json::to_string_pretty(&entries)?)
    }

    fn check_slug(
        &self,
        catalog: &Catalog,
        slug: &str,
        except_id: Option<&str>,
    ) -> Result<(), JournalError> {
        if self.options.slug_policy == SlugPolicy::Reject && catalog.slug_taken(slug, except_id) {
            return Err(JournalError::Validation(format!(
                "slug `{slug}` is already used by another entry"
            )));
        }
        Ok(())
    }

    fn derive_from_content(&self, entry: &mut Entry) {
        entry.excerpt = generate_excerpt_with_limit(&entry.content, self.options.excerpt_length);
        entry.reading_time = calculate_reading_time(&entry.content);
    }

    fn apply_patch(
        &self,
        entry: &mut Entry,
        patch: EntryPatch,
        new_slug: Option<String>,
        now: DateTime<Utc>,
    ) {
        if let Some(title) = patch.title {
            entry.title = title;
        }
        if let Some(slug) = new_slug {
            entry.slug = slug;
        }
        if let Some(content) = patch.content {
            entry.content = content;
            self.derive_from_content(entry);
        }
        if let Some(model_tag) = patch.model_tag {
            entry.model_tag = model_tag;
        }
        if let Some(page_type) = patch.page_type {
            entry.page_type = page_type;
        }
        if let Some(tags) = patch.tags {
            entry.tags = tags;
        }
        if let Some(is_published) = patch.is_published {
            entry.is_published = is_published;
        }
        if let Some(is_unlisted) = patch.is_unlisted {
            entry.is_unlisted = is_unlisted;
        }
        if let Some(is_draft) = patch.is_draft {
            entry.is_draft = is_draft;
        }
        entry.updated_at = now;
    }
}
