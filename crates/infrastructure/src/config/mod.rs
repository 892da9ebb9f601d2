//! Service configuration: structs, parsing, and validation.
//!
//! - `common`: `ConfigError` and shared validation helpers
//! - `audit`, `customers`: per-section configs

mod audit;
mod common;
mod customers;

pub use audit::AuditConfig;
pub use common::ConfigError;
pub use customers::CustomersConfig;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BIND_ADDRESS, DEFAULT_HTTP_PORT};
use common::{check_page_size, require_non_empty, warn_if_world_readable};

// ── Top-level config ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub audit: AuditConfig,

    #[serde(default)]
    pub customers: CustomersConfig,
}

impl ServiceConfig {
    /// Load config from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        warn_if_world_readable(path, "config file");
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("server.bind_address", &self.server.bind_address)?;
        if self.server.http_port == 0 {
            return Err(ConfigError::Validation {
                field: "server.http_port".to_string(),
                message: "port must be non-zero".to_string(),
            });
        }

        if self.audit.ring_capacity == 0 {
            return Err(ConfigError::Validation {
                field: "audit.ring_capacity".to_string(),
                message: "ring capacity must be at least 1".to_string(),
            });
        }
        require_non_empty("audit.storage_path", &self.audit.storage_path)?;
        if self.audit.max_page_size == 0 {
            return Err(ConfigError::Validation {
                field: "audit.max_page_size".to_string(),
                message: "max page size must be at least 1".to_string(),
            });
        }
        check_page_size("audit.page_size", self.audit.page_size, self.audit.max_page_size)?;

        require_non_empty("customers.storage_path", &self.customers.storage_path)?;
        check_page_size(
            "customers.page_size",
            self.customers.page_size,
            self.audit.max_page_size,
        )?;

        if self.audit.storage_path == self.customers.storage_path {
            return Err(ConfigError::Validation {
                field: "customers.storage_path".to_string(),
                message: "must differ from audit.storage_path".to_string(),
            });
        }

        Ok(())
    }
}

// ── Server section ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// IP address for the HTTP server to bind to. Defaults to localhost only.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_http_port")]
    pub http_port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,

    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Enable Swagger UI at `/swagger-ui`.
    #[serde(default)]
    pub swagger_ui: bool,
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}
fn default_http_port() -> u16 {
    DEFAULT_HTTP_PORT
}
fn default_log_level() -> LogLevel {
    LogLevel::Info
}
fn default_log_format() -> LogFormat {
    LogFormat::Json
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            http_port: default_http_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            swagger_ui: false,
        }
    }
}

// ── Log level ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(format!(
                "invalid log level '{s}': expected error|warn|info|debug|trace"
            )),
        }
    }
}

// ── Log format ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "pretty" => Ok(Self::Text),
            _ => Err(format!("invalid log format '{s}': expected json|text")),
        }
    }
}
