//! # itemsync
//!
//! Command-line front end for an offline-first item collection.
//!
//! ## Commands
//!
//! - `list`: List items, optionally filtered by category
//! - `add`: Create an item and push it to the remote
//! - `categories`: List categories in use
//! - `show`: Show a random item
//! - `select`: Remember a category filter
//! - `sync`: Run one sync cycle
//! - `watch`: Poll the remote periodically
//! - `conflicts`: List conflicts auto-resolved by the last cycle
//! - `resolve`: Keep the local or remote variant of each conflict
//! - `status`: Show collection and sync status
//!
//! ## Example
//!
//! ```bash
//! # Add an item
//! itemsync add "Stay hungry, stay foolish." --category Motivation
//!
//! # Reconcile with the remote
//! itemsync sync
//!
//! # Restore the local version of a conflicting item
//! itemsync resolve --keep 3f2a...=local
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{add, categories, conflicts, list, resolve, select, show, status, sync, watch};

/// Offline-first item collection with remote sync.
#[derive(Parser, Debug)]
#[command(name = "itemsync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Data directory for the collection and its configuration
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Configuration file (default: <data-dir>/itemsync.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use a canned in-process remote instead of HTTP (for testing/demo)
    #[arg(long, global = true)]
    mock: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List items
    List {
        /// Only items in this category (default: the selected category)
        #[arg(long, short)]
        category: Option<String>,
    },

    /// Create an item
    Add {
        /// Item text
        text: String,

        /// Item category
        #[arg(long, short)]
        category: String,
    },

    /// List categories in use
    Categories,

    /// Show a random item
    Show {
        /// Pick from this category (default: the selected category)
        #[arg(long, short)]
        category: Option<String>,
    },

    /// Remember a category filter ("all" for every category)
    Select {
        /// Category to select
        category: String,
    },

    /// Run one sync cycle
    Sync,

    /// Poll the remote until interrupted
    Watch {
        /// Interval between cycles (default: from configuration)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Stop after this many cycles
        #[arg(long)]
        cycles: Option<usize>,
    },

    /// List conflicts auto-resolved by the last sync
    Conflicts,

    /// Resolve pending conflicts
    Resolve {
        /// Keep a variant: <id>=local or <id>=remote (repeatable).
        /// Conflicts not named keep the remote variant.
        #[arg(long = "keep", value_name = "ID=CHOICE")]
        keep: Vec<String>,
    },

    /// Show collection and sync status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing (controlled by RUST_LOG env var)
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Determine data directory
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir)
        .await
        .context("Failed to create data directory")?;

    let ctx = commands::Context::new(data_dir, cli.config, cli.mock);

    match cli.command {
        Commands::List { category } => list::run(&ctx, category.as_deref()).await?,
        Commands::Add { text, category } => add::run(&ctx, &text, &category).await?,
        Commands::Categories => categories::run(&ctx).await?,
        Commands::Show { category } => show::run(&ctx, category.as_deref()).await?,
        Commands::Select { category } => select::run(&ctx, &category).await?,
        Commands::Sync => sync::run(&ctx).await?,
        Commands::Watch {
            interval_ms,
            cycles,
        } => watch::run(&ctx, interval_ms, cycles).await?,
        Commands::Conflicts => conflicts::run(&ctx).await?,
        Commands::Resolve { keep } => resolve::run(&ctx, &keep).await?,
        Commands::Status => status::run(&ctx).await?,
    }

    Ok(())
}

/// Get the default data directory for itemsync.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("io", "itemsync", "itemsync")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
