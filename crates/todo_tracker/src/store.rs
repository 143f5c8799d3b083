// crates/todo_tracker/src/store.rs

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::model::TodoTracker;

/// Store location, relative to the working directory, when none is given.
pub const DEFAULT_TRACKER_PATH: &str = "todo_tracker.json";

/// What to do when a store exists but cannot be read or parsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreLoadPolicy {
    /// Warn and start from an empty tracker.
    #[default]
    Reset,
    /// Report the failure to the caller.
    Fail,
}

impl StoreLoadPolicy {
    /// Parses the CLI spelling (`reset` / `fail`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "reset" => Some(StoreLoadPolicy::Reset),
            "fail" => Some(StoreLoadPolicy::Fail),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed tracker {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode tracker: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Loads the tracker at `path`.
///
/// A missing file is always an empty tracker. Any other read or parse
/// failure is logged and treated as empty under [`StoreLoadPolicy::Reset`],
/// and returned under [`StoreLoadPolicy::Fail`].
pub fn load_tracker(path: &Path, policy: StoreLoadPolicy) -> Result<TodoTracker, StoreError> {
    match read_tracker(path) {
        Ok(tracker) => {
            log::debug!("loaded {} tracked item(s) from {}", tracker.todos.len(), path.display());
            Ok(tracker)
        }
        Err(StoreError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            log::debug!("no tracker at {}, starting empty", path.display());
            Ok(TodoTracker::default())
        }
        Err(err) => match policy {
            StoreLoadPolicy::Reset => {
                log::warn!("{}; starting from an empty tracker", err);
                Ok(TodoTracker::default())
            }
            StoreLoadPolicy::Fail => Err(err),
        },
    }
}

fn read_tracker(path: &Path) -> Result<TodoTracker, StoreError> {
    let file = File::open(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        if source.is_io() {
            StoreError::Read {
                path: path.to_path_buf(),
                source: source.into(),
            }
        } else {
            StoreError::Parse {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Writes `tracker` to `path`, pretty-printed with two-space indentation
/// and a trailing newline.
///
/// The document goes to a temporary file next to `path` first and is then
/// renamed over it, so an interrupted write leaves the old store intact.
pub fn save_tracker(path: &Path, tracker: &TodoTracker) -> Result<(), StoreError> {
    let write_err = |source: io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(write_err)?;
    }

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    serde_json::to_writer_pretty(&mut tmp, tracker).map_err(|e| encode_err(path, e))?;
    tmp.write_all(b"\n").map_err(write_err)?;
    tmp.flush().map_err(write_err)?;

    // The temp file starts out 0600; the store keeps the mode it had.
    let permissions = match fs::metadata(path) {
        Ok(meta) => Some(meta.permissions()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => new_store_permissions(),
        Err(e) => return Err(write_err(e)),
    };
    if let Some(permissions) = permissions {
        tmp.as_file().set_permissions(permissions).map_err(write_err)?;
    }
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    log::debug!("saved {} item(s) to {}", tracker.todos.len(), path.display());
    Ok(())
}

/// I/O failures while encoding are write failures of `path`.
fn encode_err(path: &Path, err: serde_json::Error) -> StoreError {
    if err.is_io() {
        StoreError::Write {
            path: path.to_path_buf(),
            source: err.into(),
        }
    } else {
        StoreError::Encode(err)
    }
}

#[cfg(unix)]
fn new_store_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_store_permissions() -> Option<fs::Permissions> {
    None
}
