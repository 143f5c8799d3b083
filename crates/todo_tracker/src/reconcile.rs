// crates/todo_tracker/src/reconcile.rs

use std::collections::{HashMap, HashSet};

use todo_marker::FoundTodo;

use crate::model::{TodoItem, TodoKey};

/// Result of merging a fresh scan into the previous run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// One dated item per scanned marker, in scan order.
    pub todos: Vec<TodoItem>,
    /// Items that kept their old date.
    pub carried: usize,
    /// Items dated `now`.
    pub added: usize,
    /// Previously tracked keys that the scan no longer found.
    pub dropped: usize,
}

/// Dates every item of `found`.
///
/// An item whose `(tag, description, file, line)` key was tracked in `old`
/// keeps the old date; anything else gets `now`, the single date of this
/// run. Items only present in `old` are dropped, so the result always has
/// exactly `found.len()` entries.
///
/// If `old` holds the same key twice the later entry wins. That should not
/// happen with stores written by this tool.
pub fn reconcile(old: &[TodoItem], found: Vec<FoundTodo>, now: &str) -> Reconciliation {
    // Key -> (position in `old`, date). Later duplicates overwrite earlier ones.
    let previous: HashMap<TodoKey<'_>, (usize, &str)> = old
        .iter()
        .enumerate()
        .map(|(idx, item)| (item.key(), (idx, item.date.as_str())))
        .collect();

    let mut matched: HashSet<usize> = HashSet::new();
    let mut carried = 0;
    let mut todos = Vec::with_capacity(found.len());

    for item in found {
        let hit = previous
            .get(&(
                item.tag.as_str(),
                item.description.as_str(),
                item.file.as_str(),
                item.line,
            ))
            .map(|&(idx, date)| (idx, date.to_string()));

        let todo = match hit {
            Some((idx, date)) => {
                matched.insert(idx);
                carried += 1;
                TodoItem::dated(item, &date)
            }
            None => TodoItem::dated(item, now),
        };
        todos.push(todo);
    }

    let added = todos.len() - carried;
    let dropped = previous.len() - matched.len();
    log::debug!(
        "reconciled {} item(s): {} carried, {} new, {} resolved",
        todos.len(),
        carried,
        added,
        dropped
    );

    Reconciliation {
        todos,
        carried,
        added,
        dropped,
    }
}
