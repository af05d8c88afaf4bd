//! CLI interface for Spokely.
//!
//! With no subcommand, Spokely runs the interactive menu. The subcommands
//! are non-interactive views over the same data:
//!
//! - `spokely list`: print every work order.
//! - `spokely events`: print the most recent lifecycle events.
//!
//! `--data-dir` points any of them at a different data directory.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::config::Config;
use crate::format::{format_event, format_order};
use crate::menu;
use crate::notify::ConsoleNotifier;
use crate::storage::Store;

/// Spokely: track work orders from open to finished.
#[derive(Debug, Parser)]
#[command(name = "spokely", version)]
pub struct Cli {
    /// Directory holding `workorders.json` and `events.jsonl`.
    /// Defaults to the config's `data-dir`, then `~/.spokely/`.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print all work orders in the order they were added.
    List,

    /// Print the most recent lifecycle events, oldest first.
    Events {
        /// How many events to show (defaults to the config's `recent-events`).
        #[arg(long)]
        limit: Option<usize>,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run(cli: Cli, config: &Config) -> Result<(), String> {
    let root = resolve_root(cli.data_dir, config)?;
    let mut store = Store::open(&root).map_err(|e| format!("failed to open work orders: {e}"))?;
    debug!(root = %store.root().display(), count = store.orders().len(), "store opened");

    match cli.command {
        None => cmd_menu(&mut store),
        Some(Command::List) => cmd_list(&store, io::stdout().lock()),
        Some(Command::Events { limit }) => cmd_events(
            &store,
            limit.unwrap_or(config.recent_events),
            io::stdout().lock(),
        ),
    }
}

/// `--data-dir`, then the config file, then `~/.spokely/`.
fn resolve_root(flag: Option<PathBuf>, config: &Config) -> Result<PathBuf, String> {
    flag.or_else(|| config.data_dir.clone())
        .or_else(Store::default_root)
        .ok_or_else(|| "could not determine home directory; pass --data-dir".to_string())
}

fn cmd_menu(store: &mut Store) -> Result<(), String> {
    let mut notifier = ConsoleNotifier::stdout();
    menu::run(store, &mut notifier, io::stdin().lock(), io::stdout())
        .map_err(|e| format!("terminal error: {e}"))
}

fn cmd_list(store: &Store, mut out: impl Write) -> Result<(), String> {
    let write_err = |e: io::Error| format!("failed to write output: {e}");

    let orders = store.orders();
    if orders.is_empty() {
        writeln!(out, "No work orders").map_err(write_err)?;
        return Ok(());
    }
    for order in orders {
        writeln!(out, "{}", format_order(order)).map_err(write_err)?;
    }
    Ok(())
}

fn cmd_events(store: &Store, limit: usize, mut out: impl Write) -> Result<(), String> {
    let write_err = |e: io::Error| format!("failed to write output: {e}");
    let events = store
        .recent_events(limit)
        .map_err(|e| format!("failed to read event log: {e}"))?;

    if events.is_empty() {
        writeln!(out, "No events").map_err(write_err)?;
        return Ok(());
    }
    for event in &events {
        writeln!(out, "{}", format_event(event)).map_err(write_err)?;
    }
    Ok(())
}
