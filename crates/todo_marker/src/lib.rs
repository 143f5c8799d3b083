// crates/todo_marker/src/lib.rs

//! The tagged TODO marker (`TODO[tag]: description`) shared by the scanner
//! and the tests of every downstream crate.

use once_cell::sync::Lazy;
use regex::Regex;

/// Literal text that opens every marker.
pub const TODO_MARKER_OPEN: &str = "TODO[";

/// Literal text that separates the tag from the description.
pub const TODO_MARKER_SEP: &str = "]: ";

// Tags are ASCII word characters only; `\w` would also accept Unicode letters.
static ANYWHERE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"TODO\[([0-9A-Za-z_]+)\]: (.+)").unwrap());

static COMMENT_LEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?://|#) TODO\[([0-9A-Za-z_]+)\]: (.+)").unwrap());

/// Where on a line a marker is allowed to appear.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MarkerPolicy {
    /// `TODO[tag]: text` anywhere on the line.
    #[default]
    Anywhere,
    /// Only lines that start with a `// ` or `# ` comment leader.
    CommentLeader,
}

impl MarkerPolicy {
    /// Parses the CLI spelling (`anywhere` / `comment-leader`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "anywhere" => Some(MarkerPolicy::Anywhere),
            "comment-leader" => Some(MarkerPolicy::CommentLeader),
            _ => None,
        }
    }

    fn regex(self) -> &'static Regex {
        match self {
            MarkerPolicy::Anywhere => &ANYWHERE_RE,
            MarkerPolicy::CommentLeader => &COMMENT_LEADER_RE,
        }
    }
}

/// A marker pulled out of a single line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Marker<'a> {
    pub tag: &'a str,
    pub description: &'a str,
}

/// One marker occurrence found by the scanner, before it is dated.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FoundTodo {
    pub tag: String,
    pub description: String,
    /// Path as produced by the walk (relative or absolute, like the root).
    pub file: String,
    /// 1-based.
    pub line: usize,
}

impl FoundTodo {
    pub fn new(marker: &Marker<'_>, file: &str, line: usize) -> Self {
        Self {
            tag: marker.tag.to_string(),
            description: marker.description.to_string(),
            file: file.to_string(),
            line,
        }
    }
}

/// Returns the first marker on `line`, if any.
///
/// The description is captured verbatim up to the end of the line; only
/// the first marker is reported even when the line holds several.
pub fn extract_marker(line: &str, policy: MarkerPolicy) -> Option<Marker<'_>> {
    let caps = policy.regex().captures(line)?;
    Some(Marker {
        tag: caps.get(1)?.as_str(),
        description: caps.get(2)?.as_str(),
    })
}
