// crates/todo_summary/src/lib.rs

//! Scan → reconcile → save → render, in one synchronous pass.

use anyhow::{Context, Result};

use render_summary::render_report;
use scan_todos::scan_todos;
use todo_tracker::{load_tracker, reconcile, save_tracker, TodoTracker};

pub mod config;

pub use config::AppConfig;

/// Runs the whole pipeline and returns the Markdown to print.
///
/// The tracker is written before anything is returned, so a save failure
/// means no summary at all. Error contexts name the failing phase.
pub fn run(config: &AppConfig) -> Result<String> {
    log::info!(
        "scanning {} ({:?} mode)",
        config.root.display(),
        config.inclusion.mode()
    );
    let outcome =
        scan_todos(&config.root, &config.inclusion, &config.scan).context("Error scanning todos")?;

    let previous =
        load_tracker(&config.tracker_path, config.store_policy).context("Error loading tracker")?;

    let merged = reconcile(&previous.todos, outcome.todos, &config.today);
    log::info!(
        "{} TODO(s): {} carried over, {} new, {} resolved",
        merged.todos.len(),
        merged.carried,
        merged.added,
        merged.dropped
    );

    let tracker = TodoTracker::new(merged.todos);
    save_tracker(&config.tracker_path, &tracker).context("Error saving tracker")?;

    Ok(render_report(
        &tracker.todos,
        &outcome.skipped,
        &outcome.unreadable,
    ))
}
