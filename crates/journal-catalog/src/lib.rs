// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The prompt-journal catalog: one versioned collection of entries behind a
//! [`KvStore`](journal_core::KvStore).
//!
//! - [`ChatRepository`]: CRUD, listings, view counts, import/export
//! - [`search`]: pure filtering, tag union, popularity
//! - [`bulk`]: batch publish/unpublish/list/unlist/delete/export
//! - [`migration`]: id-deduplicating merge of a foreign collection
//! - [`AdminCatalog`]: credential-checked wrapper for mutating calls

pub mod auth;
pub mod bulk;
pub mod collection;
pub mod migration;
pub mod repository;
pub mod search;

pub use auth::{AdminCatalog, SharedSecretAuth};
pub use bulk::{BulkAction, BulkOperation, BulkOutcome};
pub use collection::{Catalog, Snapshot};
pub use migration::{merge, MergeOutcome};
pub use repository::{ChatRepository, EntryLookup, MigrationReport, RepositoryOptions};
pub use search::{get_all_tags, popular, SearchFilters, TagMatch};
