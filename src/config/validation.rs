//! Store settings validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: StoreSettings → Result<(), Vec<ValidationError>>
//! - Runs before settings reach a store

use thiserror::Error;
use crate::config::schema::StoreSettings;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("file_name must not be empty")]
    EmptyFileName,

    #[error("file_name {0:?} must be a bare file name, not a path")]
    FileNameIsPath(String),

    #[error("debounce_ms must be greater than 0")]
    ZeroDebounce,

    #[error("poll_interval_secs must be greater than 0")]
    ZeroPollInterval,

    #[error("default_section must not be empty")]
    EmptyDefaultSection,

    #[error("notify_capacity must be greater than 0")]
    ZeroNotifyCapacity,
}

pub fn validate_settings(settings: &StoreSettings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.file_name.trim().is_empty() {
        errors.push(ValidationError::EmptyFileName);
    } else if settings.file_name.contains(['/', '\\']) {
        errors.push(ValidationError::FileNameIsPath(settings.file_name.clone()));
    }
    if settings.debounce_ms == 0 {
        errors.push(ValidationError::ZeroDebounce);
    }
    if settings.poll_interval_secs == 0 {
        errors.push(ValidationError::ZeroPollInterval);
    }
    if settings.default_section.is_empty() {
        errors.push(ValidationError::EmptyDefaultSection);
    }
    // broadcast::channel panics on zero capacity
    if settings.notify_capacity == 0 {
        errors.push(ValidationError::ZeroNotifyCapacity);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_settings(&StoreSettings::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let settings = StoreSettings {
            file_name: "conf/Config.ini".into(),
            debounce_ms: 0,
            notify_capacity: 0,
            ..StoreSettings::default()
        };
        let errors = validate_settings(&settings).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::FileNameIsPath("conf/Config.ini".into()),
                ValidationError::ZeroDebounce,
                ValidationError::ZeroNotifyCapacity,
            ]
        );
    }
}
