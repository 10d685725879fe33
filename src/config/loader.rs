//! Store settings loading from disk.

use std::path::Path;
use std::fs;
use thiserror::Error;
use crate::config::schema::StoreSettings;
use crate::config::validation::{validate_settings, ValidationError};

/// Error type for settings loading.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate store settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<StoreSettings, SettingsError> {
    let content = fs::read_to_string(path)?;
    parse_settings(&content)
}

/// Parse and validate store settings from TOML text.
pub fn parse_settings(content: &str) -> Result<StoreSettings, SettingsError> {
    let settings: StoreSettings = toml::from_str(content)?;

    validate_settings(&settings).map_err(SettingsError::Validation)?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settings() {
        let settings = parse_settings("file_name = \"Lights.ini\"\ndebounce_ms = 250\n").unwrap();
        assert_eq!(settings.file_name, "Lights.ini");
        assert_eq!(settings.debounce_ms, 250);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let err = parse_settings("debounce_ms = 0\npoll_interval_secs = 0\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: debounce_ms must be greater than 0, poll_interval_secs must be greater than 0"
        );
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(parse_settings("debounce_ms = \"soon\""), Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_settings(Path::new("/nonexistent/live-ini.toml")).unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
