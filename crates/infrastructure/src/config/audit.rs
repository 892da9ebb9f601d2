//! Audit trail configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AUDIT_PAGE_SIZE, DEFAULT_AUDIT_STORAGE_PATH, DEFAULT_MAX_PAGE_SIZE,
    DEFAULT_RING_CAPACITY,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Number of recent events kept in the in-memory ring.
    #[serde(default = "default_ring_capacity")]
    pub ring_capacity: usize,

    /// Path to the redb database holding every audit event.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,

    /// Page size used when a query does not ask for one.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Upper bound for a requested page size.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

fn default_ring_capacity() -> usize {
    DEFAULT_RING_CAPACITY
}
fn default_storage_path() -> String {
    DEFAULT_AUDIT_STORAGE_PATH.to_string()
}
fn default_page_size() -> usize {
    DEFAULT_AUDIT_PAGE_SIZE
}
fn default_max_page_size() -> usize {
    DEFAULT_MAX_PAGE_SIZE
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            ring_capacity: default_ring_capacity(),
            storage_path: default_storage_path(),
            page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}
