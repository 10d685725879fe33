//! Shared utilities for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::broadcast;
use live_ini::config::ConfigChanged;

/// Sample lighting config with one aircraft override.
#[allow(dead_code)]
pub const SAMPLE: &str = "\
; annunciator colours
[Default]
EngineFireColor = Red

[Aircraft.C172]
EngineFireColor = Orange
";

/// Write `contents` to `Config.ini` inside `dir` in a single write.
pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("Config.ini");
    fs::write(&path, contents).unwrap();
    path
}

/// Wait for the next change notification, or `None` after `timeout`.
pub async fn next_change(
    changes: &mut broadcast::Receiver<ConfigChanged>,
    timeout: Duration,
) -> Option<ConfigChanged> {
    tokio::time::timeout(timeout, changes.recv()).await.ok().and_then(|r| r.ok())
}

/// Poll `condition` every 20ms until it holds or `timeout` passes.
#[allow(dead_code)]
pub async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}
