//! The live configuration store.
//!
//! # Responsibilities
//! - Own the current `ConfigSnapshot` and serve layered lookups from it
//! - Keep the snapshot in sync with one file on disk (watch, debounce, reparse)
//! - Tell subscribers when a new snapshot has been published
//!
//! # Design Decisions
//! - Snapshot lives in an `ArcSwap`: readers never lock and never see a torn view
//! - Single writer: reloads are serialized by a lock readers never touch
//! - Failed reloads keep the last good snapshot and notify nobody
//! - File reads run on the blocking pool, never on a reader's path

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use arc_swap::{ArcSwap, ArcSwapOption};
use notify::RecommendedWatcher;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;

use crate::config::debounce::Debouncer;
use crate::config::error::{ConfigError, StoreError};
use crate::config::parser::parse_str;
use crate::config::schema::StoreSettings;
use crate::config::snapshot::{ConfigSnapshot, Resolved};
use crate::config::watcher::ConfigWatcher;
use crate::observability::metrics;

/// Notification that a new snapshot was published.
///
/// Carries no configuration data; subscribers re-query the keys they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigChanged {
    pub generation: u64,
}

/// State shared with the debounce task.
struct Shared {
    settings: StoreSettings,
    current: ArcSwap<ConfigSnapshot>,
    generation: AtomicU64,
    last_error: ArcSwapOption<String>,
    path: ArcSwapOption<PathBuf>,
    changes: broadcast::Sender<ConfigChanged>,
    reload_lock: Mutex<()>,
}

impl Shared {
    fn reload_from(&self, path: &Path) -> Result<u64, ConfigError> {
        let _writer = self.reload_lock.lock().expect("reload mutex poisoned");

        tracing::debug!(path = ?path, "Reading config file");

        match read_snapshot(path) {
            Ok(snapshot) => {
                let sections = snapshot.len();
                self.last_error.store(None);
                let generation = self.publish(snapshot);
                metrics::record_reload("ok");
                tracing::info!(path = ?path, generation, sections, "Config loaded");
                Ok(generation)
            }
            Err(e) => {
                let outcome = match &e {
                    ConfigError::Malformed(_) => "malformed",
                    _ => "unavailable",
                };
                metrics::record_reload(outcome);
                tracing::error!(path = ?path, "Failed to load config: {}. Keeping current configuration.", e);
                self.last_error.store(Some(Arc::new(e.to_string())));
                Err(e)
            }
        }
    }

    fn publish(&self, snapshot: ConfigSnapshot) -> u64 {
        self.current.store(Arc::new(snapshot));
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::record_generation(generation);

        // Err only means nobody is subscribed.
        let _ = self.changes.send(ConfigChanged { generation });
        generation
    }
}

fn read_snapshot(path: &Path) -> Result<ConfigSnapshot, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::FileUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    Ok(parse_str(text)?)
}

/// Watch subscription and debounce task of a monitoring store.
struct Monitor {
    path: PathBuf,
    _watcher: RecommendedWatcher,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// A hot-reloading, scope-aware INI configuration store.
pub struct ConfigStore {
    shared: Arc<Shared>,
    monitor: Mutex<Option<Monitor>>,
}

impl ConfigStore {
    /// Create an empty store. Nothing is read until monitoring starts or a
    /// reload is requested.
    pub fn new(settings: StoreSettings) -> Self {
        let (changes, _) = broadcast::channel(settings.notify_capacity.max(1));

        Self {
            shared: Arc::new(Shared {
                settings,
                current: ArcSwap::from_pointee(ConfigSnapshot::empty()),
                generation: AtomicU64::new(0),
                last_error: ArcSwapOption::empty(),
                path: ArcSwapOption::empty(),
                changes,
                reload_lock: Mutex::new(()),
            }),
            monitor: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.shared.settings
    }

    /// Watch `path` and load it once right away.
    ///
    /// A missing or malformed file at this point is logged and leaves the
    /// store as it was; it is picked up as soon as a valid version appears.
    /// Must be called from within a Tokio runtime.
    pub fn start_monitoring(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref().to_path_buf();
        let mut monitor = self.monitor.lock().expect("monitor mutex poisoned");

        if let Some(active) = monitor.as_ref() {
            return Err(StoreError::AlreadyMonitoring(active.path.clone()));
        }

        let runtime = Handle::try_current().map_err(|_| StoreError::NoRuntime)?;
        let (watcher, events) = ConfigWatcher::new(&path, self.shared.settings.poll_interval())?;

        // Subscribe before the first read so a write racing it is not lost.
        let watcher = watcher.run()?;

        self.shared.path.store(Some(Arc::new(path.clone())));
        let _ = self.shared.reload_from(&path);

        let (shutdown, shutdown_rx) = oneshot::channel();
        let shared = self.shared.clone();
        let reload_path = path.clone();
        let debouncer = Debouncer::new(self.shared.settings.debounce());

        let task = runtime.spawn(debouncer.run(events, shutdown_rx, move || {
            let shared = shared.clone();
            let path = reload_path.clone();
            async move {
                let joined = tokio::task::spawn_blocking(move || shared.reload_from(&path)).await;
                if let Err(e) = joined {
                    tracing::error!("Reload task failed: {}", e);
                }
            }
        }));

        tracing::info!(path = ?path, debounce = ?self.shared.settings.debounce(), "Config monitoring started");

        *monitor = Some(Monitor {
            path,
            _watcher: watcher,
            shutdown,
            task,
        });
        Ok(())
    }

    /// Watch the configured file name inside `dir`.
    pub fn start_monitoring_dir(&self, dir: impl AsRef<Path>) -> Result<(), StoreError> {
        self.start_monitoring(dir.as_ref().join(&self.shared.settings.file_name))
    }

    /// Stop watching. A reload still waiting out its debounce is dropped.
    ///
    /// Returns false if the store was not monitoring.
    pub fn stop(&self) -> bool {
        let monitor = self.monitor.lock().expect("monitor mutex poisoned").take();

        match monitor {
            Some(Monitor { path, _watcher: watcher, shutdown, task }) => {
                let _ = shutdown.send(());
                drop(watcher);
                // The task exits on its own once it observes shutdown.
                drop(task);
                tracing::info!(path = ?path, "Config monitoring stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitor.lock().expect("monitor mutex poisoned").is_some()
    }

    /// The path most recently passed to `start_monitoring`.
    pub fn monitored_path(&self) -> Option<PathBuf> {
        self.shared.path.load_full().map(|path| PathBuf::clone(&path))
    }

    /// Value of `key` for `scope`, falling back to the default section.
    pub fn get_config(&self, scope: &str, key: &str) -> Option<String> {
        self.resolve(scope, key).map(|resolved| resolved.value)
    }

    /// Like `get_config`, also reporting which section supplied the value.
    pub fn resolve(&self, scope: &str, key: &str) -> Option<Resolved> {
        let settings = &self.shared.settings;
        self.shared
            .current
            .load()
            .resolve(&settings.scope_section(scope), &settings.default_section, key)
    }

    /// The current snapshot. Stays valid and unchanged across later reloads.
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        self.shared.current.load_full()
    }

    /// Receive a `ConfigChanged` after every successful publish.
    pub fn subscribe(&self) -> broadcast::Receiver<ConfigChanged> {
        self.shared.changes.subscribe()
    }

    /// Read, parse and publish `path` synchronously.
    ///
    /// On failure the current snapshot is kept and no notification is sent.
    pub fn reload_from(&self, path: impl AsRef<Path>) -> Result<u64, ConfigError> {
        self.shared.reload_from(path.as_ref())
    }

    /// `reload_from` the monitored path.
    pub fn reload(&self) -> Result<u64, ConfigError> {
        let path = self.shared.path.load_full().ok_or(ConfigError::NotMonitoring)?;
        self.shared.reload_from(&path)
    }

    /// Number of snapshots published so far; 0 while still empty.
    pub fn generation(&self) -> u64 {
        self.shared.generation.load(Ordering::SeqCst)
    }

    /// Message of the most recent failed reload, cleared by the next success.
    pub fn last_error(&self) -> Option<String> {
        self.shared.last_error.load_full().map(|e| String::clone(&e))
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(StoreSettings::default())
    }
}

impl Drop for ConfigStore {
    fn drop(&mut self) {
        self.stop();
    }
}
