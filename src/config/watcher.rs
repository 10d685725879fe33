//! Configuration file watcher for hot reload.
//!
//! Watches the directory containing the file rather than the file itself so
//! that editors which save by delete-and-rename keep being observed.

use std::path::{Path, PathBuf};
use std::time::Duration;
use notify::{Watcher, RecursiveMode, Event, RecommendedWatcher, Config};
use tokio::sync::mpsc;
use crate::config::error::StoreError;
use crate::observability::metrics;

/// True if `event` creates or modifies a file named `file_name`, ignoring case.
pub fn is_relevant(event: &Event, file_name: &str) -> bool {
    if !(event.kind.is_modify() || event.kind.is_create()) {
        return false;
    }

    let wanted = file_name.to_lowercase();
    event.paths.iter().any(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy().to_lowercase() == wanted)
            .unwrap_or(false)
    })
}

/// A watcher that forwards relevant changes of one file as unit events.
pub struct ConfigWatcher {
    dir: PathBuf,
    file_name: String,
    poll_interval: Duration,
    event_tx: mpsc::UnboundedSender<()>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher for `path`.
    ///
    /// Returns the watcher and a receiver of debounce-ready change events.
    pub fn new(
        path: &Path,
        poll_interval: Duration,
    ) -> Result<(Self, mpsc::UnboundedReceiver<()>), StoreError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| StoreError::NoFileName(path.to_path_buf()))?
            .to_string_lossy()
            .into_owned();

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Ok((Self {
            dir,
            file_name,
            poll_interval,
            event_tx,
        }, event_rx))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Start watching; events arrive on notify's own thread.
    ///
    /// The returned handle keeps the subscription alive until dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.event_tx;
        let file_name = self.file_name.clone();

        let mut watcher = RecommendedWatcher::new(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    if is_relevant(&event, &file_name) {
                        tracing::debug!(kind = ?event.kind, paths = ?event.paths, "Config file change detected");
                        metrics::record_fs_event();
                        // Receiver gone means the store stopped monitoring.
                        let _ = tx.send(());
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            }
        }, Config::default().with_poll_interval(self.poll_interval))?;

        watcher.watch(&self.dir, RecursiveMode::NonRecursive)?;

        tracing::info!(dir = ?self.dir, file = %self.file_name, "Config watcher started");
        Ok(watcher)
    }
}
