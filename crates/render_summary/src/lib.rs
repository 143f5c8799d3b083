// crates/render_summary/src/lib.rs

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use inclusion_policy::MAX_FILE_SIZE;
use todo_tracker::TodoItem;

/// Heading every summary starts with.
pub const SUMMARY_HEADING: &str = "# TODO Summary";

/// Body used when nothing was found.
pub const NO_TODOS: &str = "No TODOs found.";

/// Renders the TODO summary.
///
/// One `## tag` section per tag in lexicographic order; inside a section,
/// items are ordered by first-seen date (oldest first) and items sharing a
/// date keep their scan order.
pub fn render_todos(todos: &[TodoItem]) -> String {
    let mut out = String::new();
    out.push_str(SUMMARY_HEADING);
    out.push_str("\n\n");

    if todos.is_empty() {
        out.push_str(NO_TODOS);
        out.push('\n');
        return out;
    }

    let mut by_tag: BTreeMap<&str, Vec<&TodoItem>> = BTreeMap::new();
    for todo in todos {
        by_tag.entry(todo.tag.as_str()).or_default().push(todo);
    }

    for (tag, mut items) in by_tag {
        // ISO dates order correctly as strings; sort_by is stable.
        items.sort_by(|a, b| a.date.cmp(&b.date));

        let _ = write!(out, "## {}\n\n", tag);
        for t in items {
            let _ = writeln!(
                out,
                "- **{}** ({}:{}, {}): {}",
                t.date,
                base_name(&t.file),
                t.line,
                t.file,
                t.description
            );
        }
        out.push('\n');
    }
    out
}

/// Renders the list of files too large to scan; empty when there are none.
pub fn render_skipped(paths: &[String]) -> String {
    let heading = format!("# Skipped Files (larger than {} KB)", MAX_FILE_SIZE / 1024);
    render_path_section(&heading, paths)
}

/// Renders the list of files that could not be read; empty when there are none.
pub fn render_unreadable(paths: &[String]) -> String {
    render_path_section("# Unreadable Files", paths)
}

/// The complete stdout document: summary, a blank line, then the optional
/// skipped and unreadable sections.
pub fn render_report(todos: &[TodoItem], skipped: &[String], unreadable: &[String]) -> String {
    let mut out = render_todos(todos);
    out.push('\n');
    out.push_str(&render_skipped(skipped));
    out.push_str(&render_unreadable(unreadable));
    out
}

fn render_path_section(heading: &str, paths: &[String]) -> String {
    if paths.is_empty() {
        return String::new();
    }
    let mut out = format!("\n{}\n\n", heading);
    for path in paths {
        let _ = writeln!(out, "- {}", path);
    }
    out.push('\n');
    out
}

fn base_name(file: &str) -> &str {
    Path::new(file)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(file)
}
