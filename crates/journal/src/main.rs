// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `journal` - browse and curate a prompt-journal catalog from the terminal.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use journal_catalog::TagMatch;
use journal_core::ModelTag;

/// Browse and curate a prompt-journal catalog.
#[derive(Parser, Debug)]
#[command(name = "journal", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Admin password for mutating commands.
    #[arg(long, global = true, env = "PROMPT_JOURNAL_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List published entries.
    List {
        /// Include drafts and unpublished entries (admin).
        #[arg(long)]
        all: bool,
    },
    /// Print one published entry and count a view.
    Show { slug: String },
    /// Search published entries.
    Search {
        query: Option<String>,
        #[arg(long)]
        model: Option<ModelTag>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// How multiple --tag filters combine.
        #[arg(long = "match", default_value = "any")]
        tag_match: TagMatch,
        /// Include unlisted entries.
        #[arg(long)]
        unlisted: bool,
    },
    /// Print every tag in use.
    Tags,
    /// Most viewed listed entries.
    Popular {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Create an entry from a transcript file (admin).
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        model: Option<ModelTag>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Render as one Markdown document rather than turns.
        #[arg(long)]
        markdown: bool,
        #[arg(long)]
        publish: bool,
        #[arg(long)]
        unlisted: bool,
        #[arg(long)]
        draft: bool,
    },
    /// Change fields of an entry (admin).
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        model: Option<ModelTag>,
        /// Replace the tag set.
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long, conflicts_with = "unpublish")]
        publish: bool,
        #[arg(long)]
        unpublish: bool,
        #[arg(long, conflicts_with = "listed")]
        unlisted: bool,
        #[arg(long)]
        listed: bool,
    },
    /// Delete an entry (admin).
    Delete { id: String },
    /// Apply one operation to many entries (admin).
    Bulk {
        /// delete, publish, unpublish, list, unlist or export.
        operation: String,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Merge entries from a JSON array file, skipping known ids (admin).
    Migrate { file: PathBuf },
    /// Dump the whole collection as JSON (admin).
    Export,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => journal_config::load_and_validate_path(path),
        None => journal_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            journal_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    if let Err(e) = commands::run(&config, cli.password, cli.command).await {
        eprintln!("journal: {e}");
        std::process::exit(1);
    }
}

/// Log to stderr so command output on stdout stays machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    // `journal` also matches the `journal_*` library targets.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("journal={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
