//! Error types for parsing, reloading and monitoring.

use std::path::PathBuf;
use thiserror::Error;

/// A line in the configuration file that could not be accepted.
///
/// Line numbers are 1-based, counted in file order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `key = value` line appeared before any `[Section]` header.
    #[error("line {line}: key/value pair outside of any section")]
    KeyOutsideSection { line: usize },

    /// The same section header appeared twice in one file.
    #[error("line {line}: duplicate section [{name}]")]
    DuplicateSection { line: usize, name: String },
}

impl ParseError {
    /// The 1-based line number the error was raised on.
    pub fn line(&self) -> usize {
        match self {
            ParseError::KeyOutsideSection { line } => *line,
            ParseError::DuplicateSection { line, .. } => *line,
        }
    }
}

/// Failure of a single read-and-parse attempt.
///
/// None of these ever reach callers of `get_config`; the store logs them and
/// keeps serving the last good snapshot.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be opened or read (missing, locked, permission denied).
    #[error("config file {path} unavailable: {source}")]
    FileUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but its contents were rejected.
    #[error("malformed config: {0}")]
    Malformed(#[from] ParseError),

    /// `reload()` was called before a path was ever monitored.
    #[error("no config file is being monitored")]
    NotMonitoring,
}

/// Failure to start monitoring.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store is already monitoring {0}")]
    AlreadyMonitoring(PathBuf),

    #[error("start_monitoring must be called from within a Tokio runtime")]
    NoRuntime,

    #[error("path {0} has no file name")]
    NoFileName(PathBuf),

    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::from(ParseError::DuplicateSection {
            line: 7,
            name: "Default".into(),
        });
        assert_eq!(err.to_string(), "malformed config: line 7: duplicate section [Default]");

        let err = ConfigError::FileUnavailable {
            path: PathBuf::from("Config.ini"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("Config.ini"));
    }

    #[test]
    fn test_parse_error_line() {
        assert_eq!(ParseError::KeyOutsideSection { line: 3 }.line(), 3);
    }
}
