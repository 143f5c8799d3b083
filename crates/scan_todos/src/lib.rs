// crates/scan_todos/src/lib.rs

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Component, Path, PathBuf};

use inclusion_policy::{Decision, InclusionPolicy};
use thiserror::Error;
use todo_marker::{extract_marker, FoundTodo, MarkerPolicy};
use walkdir::WalkDir;

/// A failure that aborts the whole scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("walking {path}: {source}")]
    Walk {
        path: String,
        #[source]
        source: walkdir::Error,
    },

    #[error("reading {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Knobs that change how accepted files are read.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScanOptions {
    pub marker_policy: MarkerPolicy,
    /// Log and record unreadable files instead of aborting.
    pub skip_unreadable: bool,
}

/// Everything a scan produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Markers in walk order (files by name, lines ascending).
    pub todos: Vec<FoundTodo>,
    /// Files over the size limit, never opened.
    pub skipped: Vec<String>,
    /// Files that failed to read; only filled with `skip_unreadable`.
    pub unreadable: Vec<String>,
}

/// Walks `root`, applies `policy` to every entry and collects the markers
/// of each accepted file.
///
/// Entries are visited sorted by file name so repeated scans of the same
/// tree yield the same order. Any walk error aborts the scan; read errors
/// abort it too unless `options.skip_unreadable` is set.
pub fn scan_todos(
    root: &Path,
    policy: &InclusionPolicy,
    options: &ScanOptions,
) -> Result<ScanOutcome, ScanError> {
    let mut outcome = ScanOutcome::default();

    let mut walker = WalkDir::new(root).sort_by_file_name().into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|source| ScanError::Walk {
            path: source
                .path()
                .map(walk_path_string)
                .unwrap_or_else(|| walk_path_string(root)),
            source,
        })?;

        let path = walk_path_string(entry.path());
        let is_dir = entry.file_type().is_dir();

        // The root itself is always descended, whatever its name.
        if is_dir && entry.depth() == 0 {
            continue;
        }

        match policy.decide(&path, is_dir) {
            Decision::SkipSubtree => {
                log::debug!("skipping subtree {}", path);
                walker.skip_current_dir();
                continue;
            }
            Decision::SkipEntry => {
                log::debug!("skipping {}", path);
                continue;
            }
            Decision::Accept => {}
        }

        if is_dir {
            continue;
        }

        let metadata = match fs::metadata(entry.path()) {
            Ok(metadata) => metadata,
            Err(source) if options.skip_unreadable => {
                log::warn!("could not stat {}: {}", path, source);
                outcome.unreadable.push(path);
                continue;
            }
            Err(source) => return Err(ScanError::Read { path, source }),
        };
        if metadata.is_dir() {
            // A symlink to a directory; the walk does not follow links.
            log::debug!("not following directory link {}", path);
            continue;
        }
        if policy.exceeds_size_limit(metadata.len()) {
            log::info!("skipping {} ({} bytes)", path, metadata.len());
            outcome.skipped.push(path);
            continue;
        }

        match scan_file(entry.path(), &path, options.marker_policy) {
            Ok(found) => outcome.todos.extend(found),
            Err(source) if options.skip_unreadable => {
                log::warn!("could not read {}: {}", path, source);
                outcome.unreadable.push(path);
            }
            Err(source) => return Err(ScanError::Read { path, source }),
        }
    }

    log::debug!(
        "scan found {} marker(s), skipped {} file(s)",
        outcome.todos.len(),
        outcome.skipped.len()
    );
    Ok(outcome)
}

/// Extracts the markers of one file, labelling them with `display_path`.
///
/// Lines are split on `\n` with a trailing `\r` dropped; the final line is
/// kept even without a terminator. Bytes that are not UTF-8 are replaced
/// rather than rejected, so binary files scan as (mostly empty) text.
pub fn scan_file(
    path: &Path,
    display_path: &str,
    policy: MarkerPolicy,
) -> io::Result<Vec<FoundTodo>> {
    let reader = BufReader::new(File::open(path)?);
    let mut found = Vec::new();
    for (idx, raw) in reader.split(b'\n').enumerate() {
        let mut raw = raw?;
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        let line = String::from_utf8_lossy(&raw);
        if let Some(marker) = extract_marker(&line, policy) {
            found.push(FoundTodo::new(&marker, display_path, idx + 1));
        }
    }
    Ok(found)
}

/// Renders a walked path the way it is stored and matched: `.` components
/// are dropped, so walking `.` yields `src/main.go` rather than
/// `./src/main.go`. The bare root stays `.`.
pub fn walk_path_string(path: &Path) -> String {
    let cleaned: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if cleaned.as_os_str().is_empty() {
        ".".to_string()
    } else {
        cleaned.to_string_lossy().into_owned()
    }
}
