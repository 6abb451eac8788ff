// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog behaviour against the durable SQLite store.

use std::sync::Arc;

use journal_catalog::{
    BulkAction, BulkOperation, ChatRepository, EntryLookup, RepositoryOptions, SearchFilters,
    TagMatch,
};
use journal_config::model::StorageConfig;
use journal_core::{EntryDraft, ErrorKind, KvStore, PluginAdapter};
use journal_storage::SqliteKvStore;
use tempfile::TempDir;

async fn open(dir: &TempDir) -> ChatRepository {
    let config = StorageConfig {
        database_path: dir.path().join("journal.db").to_string_lossy().into_owned(),
        ..StorageConfig::default()
    };
    let store: Arc<dyn KvStore> = Arc::new(SqliteKvStore::open(&config).await.unwrap());
    ChatRepository::new(store, RepositoryOptions::default())
}

fn draft(title: &str, tags: &[&str]) -> EntryDraft {
    EntryDraft {
        title: title.to_string(),
        content: format!("### User\n\n{title}?\n\n---\n\n### Assistant\n\nAnswer."),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        is_published: true,
        ..EntryDraft::default()
    }
}

#[tokio::test]
async fn collection_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let id = {
        let repo = open(&dir).await;
        let entry = repo.create(draft("Durable entry", &["rust"])).await.unwrap();
        repo.store().shutdown().await.unwrap();
        entry.id
    };

    let repo = open(&dir).await;
    let entry = repo.get(EntryLookup::Id(&id)).await.unwrap().unwrap();
    assert_eq!(entry.slug, "durable-entry");
    assert_eq!(entry.excerpt, "Durable entry?...");
    assert_eq!(repo.snapshot().await.unwrap().version, 1);
}

#[tokio::test]
async fn two_repositories_on_one_store_detect_lost_updates() {
    let dir = TempDir::new().unwrap();
    let repo = open(&dir).await;
    repo.create(draft("Base", &[])).await.unwrap();

    let stale = repo.snapshot().await.unwrap();
    repo.create(draft("Winner", &[])).await.unwrap();

    let err = repo
        .store()
        .put(
            &repo.options().collection_key,
            stale.catalog.to_json().unwrap(),
            stale.version,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(repo.list_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn search_and_bulk_over_sqlite() {
    let dir = TempDir::new().unwrap();
    let repo = open(&dir).await;
    let a = repo.create(draft("Ownership", &["rust", "memory"])).await.unwrap();
    let b = repo.create(draft("Generators", &["python"])).await.unwrap();

    let outcome = repo
        .apply_bulk(&BulkOperation::new(BulkAction::Unlist, vec![a.id.clone()]))
        .await
        .unwrap();
    assert_eq!(outcome.count(), 1);

    let public = repo.search(&SearchFilters::new(TagMatch::Any)).await.unwrap();
    assert_eq!(public.iter().map(|e| &e.id).collect::<Vec<_>>(), [&b.id]);

    let with_unlisted = repo
        .search(
            &SearchFilters::new(TagMatch::All)
                .with_tag("rust")
                .with_tag("memory")
                .with_unlisted(true),
        )
        .await
        .unwrap();
    assert_eq!(with_unlisted.len(), 1);
    assert_eq!(with_unlisted[0].id, a.id);

    assert_eq!(repo.all_tags().await.unwrap(), ["memory", "python", "rust"]);
}
