//! Shared helpers and the config error type.

use std::path::Path;

use tracing::warn;

// ── Config errors ──────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(String),

    #[error("validation error: {field}: {message}")]
    Validation { field: String, message: String },
}

impl From<serde_yaml_ng::Error> for ConfigError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        Self::Yaml(e.to_string())
    }
}

// ── Validation helpers ─────────────────────────────────────────────

pub(super) fn require_non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(())
}

/// `page_size` must be in `1..=max`.
pub(super) fn check_page_size(field: &str, size: usize, max: usize) -> Result<(), ConfigError> {
    if size == 0 || size > max {
        return Err(ConfigError::Validation {
            field: field.to_string(),
            message: format!("page size {size} must be between 1 and {max}"),
        });
    }
    Ok(())
}

#[cfg(unix)]
pub(super) fn warn_if_world_readable(path: &Path, label: &str) {
    use std::os::unix::fs::PermissionsExt;
    if let Ok(metadata) = std::fs::metadata(path) {
        let mode = metadata.permissions().mode();
        if mode & 0o004 != 0 {
            warn!(
                path = %path.display(),
                mode = format!("{mode:04o}"),
                "{label} is world-readable, consider chmod 640 or stricter",
            );
        }
    }
}

#[cfg(not(unix))]
pub(super) fn warn_if_world_readable(_path: &Path, _label: &str) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_value_is_rejected() {
        let err = require_non_empty("audit.storage_path", "  ").unwrap_err();
        assert!(err.to_string().contains("audit.storage_path"));
        assert!(require_non_empty("audit.storage_path", "a.redb").is_ok());
    }

    #[test]
    fn page_size_bounds() {
        assert!(check_page_size("audit.page_size", 0, 10).is_err());
        assert!(check_page_size("audit.page_size", 11, 10).is_err());
        assert!(check_page_size("audit.page_size", 1, 10).is_ok());
        assert!(check_page_size("audit.page_size", 10, 10).is_ok());
    }

    #[test]
    fn yaml_error_converts() {
        let err: ConfigError = serde_yaml_ng::from_str::<u32>("not: [a")
            .unwrap_err()
            .into();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
