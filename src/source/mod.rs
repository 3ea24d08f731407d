//! The data-access collaborator: where record batches come from.
//!
//! The tree builder never performs I/O; fetches run off the UI thread
//! and resolve back into the event loop, so network-style failures
//! surface in the status bar while the forest stays untouched.

pub mod json;
pub mod watcher;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::Result;
use crate::event::Event;
use crate::tree::builder::FlatRecord;

pub use json::JsonFileSource;

/// Supplies flat record batches for the tree.
///
/// `fetch_roots` serves the initial load: the full record set in eager
/// mode, or the root-level slice in lazy mode. `fetch_children` serves
/// the immediate-child slice under one folder path.
pub trait RecordSource: Send + Sync {
    fn fetch_roots(&self) -> Result<Vec<FlatRecord>>;
    fn fetch_children(&self, parent_path: &str) -> Result<Vec<FlatRecord>>;
}

/// Run a full/root fetch on a blocking worker and resolve it into the
/// event loop.
pub fn spawn_roots_fetch(source: Arc<dyn RecordSource>, tx: mpsc::UnboundedSender<Event>) {
    tokio::spawn(async move {
        let outcome = tokio::task::spawn_blocking(move || source.fetch_roots()).await;
        let event = match outcome {
            Ok(Ok(records)) => Event::RecordsLoaded(records),
            Ok(Err(e)) => Event::LoadFailed {
                parent_path: None,
                message: e.to_string(),
            },
            Err(e) => Event::LoadFailed {
                parent_path: None,
                message: e.to_string(),
            },
        };
        let _ = tx.send(event);
    });
}

/// Run a child-batch fetch for one folder on a blocking worker and
/// resolve it into the event loop.
pub fn spawn_children_fetch(
    source: Arc<dyn RecordSource>,
    parent_path: String,
    tx: mpsc::UnboundedSender<Event>,
) {
    tokio::spawn(async move {
        let fetch_path = parent_path.clone();
        let outcome =
            tokio::task::spawn_blocking(move || source.fetch_children(&fetch_path)).await;
        let event = match outcome {
            Ok(Ok(records)) => Event::ChildrenLoaded {
                parent_path,
                records,
            },
            Ok(Err(e)) => Event::LoadFailed {
                parent_path: Some(parent_path),
                message: e.to_string(),
            },
            Err(e) => Event::LoadFailed {
                parent_path: Some(parent_path),
                message: e.to_string(),
            },
        };
        let _ = tx.send(event);
    });
}
