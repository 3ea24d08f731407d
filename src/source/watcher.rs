use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use tokio::sync::mpsc;

use crate::event::Event;

/// Default debounce interval in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Watches the records file and emits a reload event when it changes.
///
/// The parent directory is watched (non-recursively) rather than the
/// file itself, so editors that replace the file via rename are still
/// observed; events for sibling files are dropped.
pub struct SourceWatcher {
    /// Whether the watcher is currently forwarding events.
    active: Arc<AtomicBool>,
    /// Handle to the debouncer (dropped to stop watching).
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
}

impl SourceWatcher {
    /// Create a new SourceWatcher for the given records file.
    ///
    /// Changes are debounced by `debounce_duration` and collapse into a
    /// single `Event::SourceChanged` per window.
    pub fn new(
        file: &Path,
        debounce_duration: Duration,
        event_tx: mpsc::UnboundedSender<Event>,
    ) -> notify::Result<Self> {
        let active = Arc::new(AtomicBool::new(true));
        let active_clone = active.clone();
        let file_path = file.to_path_buf();

        let mut debouncer = new_debouncer(
            debounce_duration,
            move |result: Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>| {
                // If paused, silently drop events
                if !active_clone.load(Ordering::Relaxed) {
                    return;
                }

                match result {
                    Ok(events) => {
                        let relevant = events.iter().any(|e| {
                            e.kind == DebouncedEventKind::Any && e.path == file_path
                        });
                        if relevant {
                            let _ = event_tx.send(Event::SourceChanged);
                        }
                    }
                    Err(_errors) => {
                        // Watcher errors are non-fatal; silently ignore
                    }
                }
            },
        )?;

        let watch_root = file.parent().unwrap_or(file);
        debouncer
            .watcher()
            .watch(watch_root, notify::RecursiveMode::NonRecursive)?;

        Ok(Self {
            active,
            _debouncer: debouncer,
        })
    }

    /// Pause event forwarding (watcher stays alive to avoid re-creating inotify watches).
    pub fn pause(&self) {
        self.active.store(false, Ordering::Relaxed);
    }

    /// Resume event forwarding.
    pub fn resume(&self) {
        self.active.store(true, Ordering::Relaxed);
    }

    /// Check if the watcher is currently active (forwarding events).
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}
