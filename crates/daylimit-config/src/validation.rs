//! Configuration validation

use crate::schema::RawConfig;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("limits.{field}: {message}")]
    LimitError { field: &'static str, message: String },

    #[error("service.data_dir: {0}")]
    DataDirError(String),
}

/// Validate a raw configuration, collecting every problem found
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.limits.default_daily_limit_seconds == Some(0) {
        errors.push(ValidationError::LimitError {
            field: "default_daily_limit_seconds",
            message: "must be greater than zero".into(),
        });
    }

    if config.limits.warning_threshold_seconds == Some(0) {
        errors.push(ValidationError::LimitError {
            field: "warning_threshold_seconds",
            message: "must be greater than zero".into(),
        });
    }

    if let Some(dir) = &config.service.data_dir
        && dir.as_os_str().is_empty()
    {
        errors.push(ValidationError::DataDirError("cannot be empty".into()));
    }

    errors
}
