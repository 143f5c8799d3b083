// crates/inclusion_policy/src/lib.rs

//! Decides which entries of a directory walk get read.
//!
//! A policy is built once at startup and never mutated afterwards. Two
//! modes exist:
//!
//!  * **Deny list**: everything is scanned except entries matching the
//!    deny list (`.action-tmp` plus any `--blacklist` additions, minus any
//!    `--whitelist` negations).
//!  * **Allow list**: only recognised source/config extensions (and a few
//!    conventional extensionless build files) are scanned. Dotfiles and
//!    tool directories never are, but other dot directories such as
//!    `.github` are still walked. The deny list still applies on top.
//!
//! A deny entry is tried three ways against every path: as a base name
//! (case-insensitive), as an extension including the dot
//! (case-insensitive) and as a prefix of the full path (case-sensitive).
//! A denied directory drops its whole subtree; a denied file drops only
//! itself.

use std::collections::BTreeSet;
use std::path::Path;

/// Files larger than this many bytes are reported instead of scanned.
pub const MAX_FILE_SIZE: u64 = 500 * 1024;

/// The tool's own scratch directory when it runs inside CI.
pub const BASE_DENY_LIST: &[&str] = &[".action-tmp"];

/// Extensions read in allow-list mode.
pub const SOURCE_EXTENSIONS: &[&str] = &[
    // Source & scripting
    ".c", ".h", ".cpp", ".hpp", ".java", ".js", ".jsx", ".ts", ".tsx", ".py", ".go", ".cs",
    ".rb", ".php", ".sh", ".swift", ".kt", ".rs",
    // Markup, styling, data
    ".html", ".htm", ".css", ".scss", ".less", ".xml", ".yaml", ".yml", ".md", ".sql",
];

/// Names never scanned or descended in allow-list mode (compared lowercase).
pub const ALWAYS_EXCLUDED_NAMES: &[&str] = &[
    ".git",
    ".vscode",
    ".idea",
    ".ds_store",
    "thumbs.db",
    "__pycache__",
];

/// Extensionless files still read in allow-list mode (compared lowercase).
pub const EXTENSIONLESS_BUILD_FILES: &[&str] = &["dockerfile", "makefile"];

/// Which of the two filtering variants is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterMode {
    AllowList,
    #[default]
    DenyList,
}

impl FilterMode {
    /// Parses the CLI spelling (`allow-list` / `deny-list`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "allow-list" => Some(FilterMode::AllowList),
            "deny-list" => Some(FilterMode::DenyList),
            _ => None,
        }
    }
}

/// Outcome for one walked entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Read the file, or descend into the directory.
    Accept,
    /// Skip this file only.
    SkipEntry,
    /// Skip the directory and everything below it.
    SkipSubtree,
}

/// Immutable inclusion ruleset handed to the scanner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InclusionPolicy {
    mode: FilterMode,
    deny: BTreeSet<String>,
    max_file_size: u64,
}

impl Default for InclusionPolicy {
    fn default() -> Self {
        Self::new(FilterMode::default())
    }
}

impl InclusionPolicy {
    /// A policy with the base deny list and the default size limit.
    pub fn new(mode: FilterMode) -> Self {
        Self {
            mode,
            deny: BASE_DENY_LIST.iter().map(|s| s.to_string()).collect(),
            max_file_size: MAX_FILE_SIZE,
        }
    }

    /// Adds each entry to the deny list. Blank entries are ignored.
    pub fn with_blacklist<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entry in entries {
            let entry = entry.as_ref().trim();
            if !entry.is_empty() {
                self.deny.insert(entry.to_string());
            }
        }
        self
    }

    /// Removes each entry from the deny list.
    ///
    /// This is a negation, not an allow list: whitelisting something that
    /// was never denied changes nothing. Apply after [`with_blacklist`].
    ///
    /// [`with_blacklist`]: InclusionPolicy::with_blacklist
    pub fn with_whitelist<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entry in entries {
            let entry = entry.as_ref().trim();
            if entry.is_empty() {
                continue;
            }
            if !self.deny.remove(entry) {
                log::debug!("whitelist entry {:?} was not on the deny list", entry);
            }
        }
        self
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Current deny entries, sorted.
    pub fn deny_entries(&self) -> impl Iterator<Item = &str> {
        self.deny.iter().map(String::as_str)
    }

    /// `true` when a file of `len` bytes must be reported rather than read.
    pub fn exceeds_size_limit(&self, len: u64) -> bool {
        len > self.max_file_size
    }

    /// Decides what to do with `path` as produced by the walk.
    pub fn decide(&self, path: &str, is_dir: bool) -> Decision {
        let skip = if is_dir {
            Decision::SkipSubtree
        } else {
            Decision::SkipEntry
        };

        if self.is_denied(path) {
            return skip;
        }

        match self.mode {
            FilterMode::DenyList => Decision::Accept,
            FilterMode::AllowList => {
                let base = base_name(path).to_lowercase();
                if is_tool_entry(&base) {
                    skip
                } else if is_dir {
                    Decision::Accept
                } else if !base.starts_with('.') && is_recognised_file(&base) {
                    Decision::Accept
                } else {
                    Decision::SkipEntry
                }
            }
        }
    }

    /// `true` when any deny entry matches `path` by name, extension or prefix.
    pub fn is_denied(&self, path: &str) -> bool {
        let base = base_name(path).to_lowercase();
        let ext = extension_of(&base);
        self.deny.iter().any(|entry| {
            let lowered = entry.to_lowercase();
            lowered == base
                || (!ext.is_empty() && lowered == ext)
                || path.starts_with(entry.as_str())
        })
    }
}

/// Splits a comma-separated CLI list, trimming entries and dropping blanks.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Final path segment, or the whole string when there is none (`.`, `/`).
fn base_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
}

/// Extension including the leading dot, from the last dot of `name`.
///
/// Unlike `Path::extension`, a dotfile such as `.env` has extension `.env`.
fn extension_of(name: &str) -> &str {
    name.rfind('.').map(|i| &name[i..]).unwrap_or("")
}

fn is_tool_entry(base: &str) -> bool {
    ALWAYS_EXCLUDED_NAMES.contains(&base)
}

fn is_recognised_file(base: &str) -> bool {
    if EXTENSIONLESS_BUILD_FILES.contains(&base) {
        return true;
    }
    let ext = extension_of(base);
    !ext.is_empty() && SOURCE_EXTENSIONS.contains(&ext)
}
