// crates/todo_tracker/src/model.rs

use serde::{Deserialize, Deserializer, Serialize};
use todo_marker::FoundTodo;

/// A marker together with the date it was first seen.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoItem {
    pub tag: String,
    pub description: String,
    pub file: String,
    pub line: usize,
    /// `YYYY-MM-DD`; never rewritten once set.
    pub date: String,
}

/// Identity of an item across runs. All four fields must match byte for
/// byte, so a reworded description or a shifted line counts as new.
pub type TodoKey<'a> = (&'a str, &'a str, &'a str, usize);

impl TodoItem {
    pub fn dated(found: FoundTodo, date: &str) -> Self {
        Self {
            tag: found.tag,
            description: found.description,
            file: found.file,
            line: found.line,
            date: date.to_string(),
        }
    }

    pub fn key(&self) -> TodoKey<'_> {
        (&self.tag, &self.description, &self.file, self.line)
    }
}

/// The persisted document: `{"todos": [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoTracker {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub todos: Vec<TodoItem>,
}

impl TodoTracker {
    pub fn new(todos: Vec<TodoItem>) -> Self {
        Self { todos }
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }
}

// Older stores wrote `"todos": null` for an empty run.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<TodoItem>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<TodoItem>>::deserialize(deserializer)?.unwrap_or_default())
}
