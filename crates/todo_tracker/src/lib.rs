// crates/todo_tracker/src/lib.rs

//! Persistent first-seen tracking for TODO markers.
//!
//!  * `model`: the dated [`TodoItem`] and the [`TodoTracker`] document.
//!  * `reconcile`: carries first-seen dates from the previous run over to
//!    a fresh scan.
//!  * `store`: loads and saves the JSON document.

mod model;
mod reconcile;
mod store;

pub use model::{TodoItem, TodoKey, TodoTracker};
pub use reconcile::{reconcile, Reconciliation};
pub use store::{load_tracker, save_tracker, StoreError, StoreLoadPolicy, DEFAULT_TRACKER_PATH};
