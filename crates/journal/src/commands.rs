// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations.
//!
//! Read-only commands go straight to the repository. Mutating commands go
//! through [`AdminCatalog`], which checks the admin password first.

use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use journal_catalog::{
    AdminCatalog, BulkAction, BulkOperation, BulkOutcome, ChatRepository, RepositoryOptions,
    SearchFilters, SharedSecretAuth,
};
use journal_config::JournalConfig;
use journal_core::{Entry, EntryDraft, EntryPatch, JournalError, PageType, PluginAdapter, Role};
use journal_transcript::{format_reading_time, parse_conversation};
use tracing::{debug, warn};

use crate::Commands;

struct Session {
    repo: Arc<ChatRepository>,
    admin: AdminCatalog,
    password: Option<String>,
    popular_limit: usize,
}

impl Session {
    /// The credential for a mutating call: `--password`/env, else an
    /// interactive prompt, else empty (which the gate rejects).
    fn credential(&self) -> Result<String, JournalError> {
        if let Some(password) = &self.password {
            return Ok(password.clone());
        }
        if std::io::stdin().is_terminal() {
            return rpassword::prompt_password("Admin password: ")
                .map_err(|e| JournalError::Internal(format!("failed to read password: {e}")));
        }
        Ok(String::new())
    }
}

pub async fn run(
    config: &JournalConfig,
    password: Option<String>,
    command: Commands,
) -> Result<(), JournalError> {
    colored::control::set_override(std::io::stdout().is_terminal());

    let store = journal_storage::open_store(&config.storage).await?;
    let repo = Arc::new(ChatRepository::new(
        Arc::clone(&store),
        RepositoryOptions::from_config(config),
    ));
    let auth = Arc::new(SharedSecretAuth::from_password(
        config.security.admin_password.as_deref(),
    ));
    let session = Session {
        admin: AdminCatalog::new(Arc::clone(&repo), auth),
        repo,
        password,
        popular_limit: config.catalog.popular_limit,
    };

    let result = dispatch(&session, command).await;
    let shutdown = store.shutdown().await;
    finish(result, shutdown)
}

/// A dispatch error outranks a shutdown error; the latter is only logged then.
fn finish(
    result: Result<(), JournalError>,
    shutdown: Result<(), JournalError>,
) -> Result<(), JournalError> {
    match (result, shutdown) {
        (Err(err), Err(shutdown_err)) => {
            warn!(error = %shutdown_err, "store shutdown failed");
            Err(err)
        }
        (Err(err), Ok(())) => Err(err),
        (Ok(()), shutdown) => shutdown,
    }
}

/// Views to display after counting one. A lost race with a concurrent writer
/// skips the count instead of failing the read.
fn views_after(
    counted: Result<Option<u64>, JournalError>,
    current: u64,
) -> Result<u64, JournalError> {
    match counted {
        Ok(views) => Ok(views.unwrap_or(current)),
        Err(err @ JournalError::Conflict { .. }) => {
            warn!(error = %err, "view not counted");
            Ok(current)
        }
        Err(err) => Err(err),
    }
}

async fn dispatch(session: &Session, command: Commands) -> Result<(), JournalError> {
    match command {
        Commands::List { all } => {
            let entries = if all {
                session.admin.list_all(&session.credential()?).await?
            } else {
                session.repo.list_published().await?
            };
            print_entries(&entries, all);
        }
        Commands::Show { slug } => {
            let entry = session
                .repo
                .get_published_by_slug(&slug)
                .await?
                .ok_or_else(|| JournalError::NotFound {
                    what: "entry",
                    key: slug.clone(),
                })?;
            let views = views_after(session.repo.record_view(&slug).await, entry.views)?;
            print_entry(&entry, views);
        }
        Commands::Search {
            query,
            model,
            tags,
            tag_match,
            unlisted,
        } => {
            let filters = SearchFilters {
                query: query.unwrap_or_default(),
                model_tag: model,
                tags,
                tag_match,
                include_unlisted: unlisted,
            };
            print_entries(&session.repo.search(&filters).await?, false);
        }
        Commands::Tags => {
            for tag in session.repo.all_tags().await? {
                println!("{tag}");
            }
        }
        Commands::Popular { limit } => {
            let limit = limit.unwrap_or(session.popular_limit);
            for entry in session.repo.popular(limit).await? {
                println!("{:>6}  {}  {}", entry.views, entry.slug.bold(), entry.title);
            }
        }
        Commands::Create {
            title,
            file,
            model,
            tags,
            markdown,
            publish,
            unlisted,
            draft,
        } => {
            let draft = EntryDraft {
                title,
                content: read_file(&file)?,
                model_tag: model.unwrap_or_default(),
                page_type: if markdown {
                    PageType::Markdown
                } else {
                    PageType::Conversation
                },
                tags,
                is_published: publish,
                is_unlisted: unlisted,
                is_draft: draft,
            };
            let entry = session.admin.create(&session.credential()?, draft).await?;
            println!("{} {} ({})", "created".green(), entry.slug, entry.id);
        }
        Commands::Update {
            id,
            title,
            file,
            model,
            tags,
            publish,
            unpublish,
            unlisted,
            listed,
        } => {
            let patch = EntryPatch {
                title,
                content: file.as_deref().map(read_file).transpose()?,
                model_tag: model,
                tags: (!tags.is_empty()).then_some(tags),
                is_published: flag_pair(publish, unpublish),
                is_unlisted: flag_pair(unlisted, listed),
                ..EntryPatch::default()
            };
            let entry = session
                .admin
                .update(&session.credential()?, &id, patch)
                .await?;
            println!("{} {} ({})", "updated".green(), entry.slug, entry.id);
        }
        Commands::Delete { id } => {
            if session.admin.delete(&session.credential()?, &id).await? {
                println!("{} {id}", "deleted".green());
            } else {
                return Err(JournalError::entry_not_found(id));
            }
        }
        Commands::Bulk { operation, ids } => {
            let operation = BulkOperation::new(BulkAction::parse(&operation)?, ids);
            match session
                .admin
                .apply_bulk(&session.credential()?, &operation)
                .await?
            {
                BulkOutcome::Deleted { count } => println!("deleted {count} entries"),
                BulkOutcome::Updated { count } => {
                    println!("{} {count} entries", operation.action)
                }
                exported @ BulkOutcome::Exported { .. } => {
                    println!("{}", exported.to_export_json()?)
                }
            }
        }
        Commands::Migrate { file } => {
            let json = read_file(&file)?;
            let report = session
                .admin
                .import_json(&session.credential()?, &json)
                .await?;
            println!(
                "migrated {} entries ({} skipped, {} total)",
                report.added, report.skipped, report.total
            );
        }
        Commands::Export => {
            println!("{}", session.admin.export_all(&session.credential()?).await?);
        }
    }
    Ok(())
}

/// `--on` / `--off` flag pair as a tri-state. Clap rejects both together.
fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn read_file(path: &Path) -> Result<String, JournalError> {
    debug!(path = %path.display(), "reading input file");
    std::fs::read_to_string(path).map_err(|e| {
        JournalError::Validation(format!("cannot read {}: {e}", path.display()))
    })
}

fn status_label(entry: &Entry) -> String {
    match (entry.is_published, entry.is_unlisted, entry.is_draft) {
        (_, _, true) => "draft".yellow().to_string(),
        (false, _, _) => "unpublished".red().to_string(),
        (true, true, _) => "unlisted".dimmed().to_string(),
        (true, false, _) => "published".green().to_string(),
    }
}

fn print_entries(entries: &[Entry], with_status: bool) {
    for entry in entries {
        let model = format!("[{}]", entry.model_tag.display_name());
        if with_status {
            println!(
                "{}  {}  {}  {}  {}",
                entry.id.dimmed(),
                entry.slug.bold(),
                entry.title,
                model.cyan(),
                status_label(entry)
            );
        } else {
            println!(
                "{}  {}  {}  {}",
                entry.slug.bold(),
                entry.title,
                model.cyan(),
                format_reading_time(entry.reading_time).dimmed()
            );
        }
    }
}

fn print_entry(entry: &Entry, views: u64) {
    println!("{}", entry.title.bold());
    println!(
        "{}  {}  {} views",
        entry.model_tag.display_name().cyan(),
        format_reading_time(entry.reading_time),
        views
    );
    if !entry.tags.is_empty() {
        println!("{}", entry.tags.join(", ").dimmed());
    }
    println!();

    match entry.page_type {
        PageType::Markdown => println!("{}", entry.content),
        PageType::Conversation => {
            for message in parse_conversation(&entry.content) {
                let speaker = match message.role {
                    Role::User => "User".blue().bold(),
                    Role::Assistant => "Assistant".magenta().bold(),
                };
                println!("{speaker}\n{}\n", message.content);
            }
        }
    }
}
