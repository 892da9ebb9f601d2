use std::time::Duration;

// ── Network defaults ───────────────────────────────────────────────

pub const DEFAULT_CONFIG_PATH: &str = "/etc/trailkeeper/config.yaml";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";

// ── Audit trail ────────────────────────────────────────────────────

pub const DEFAULT_RING_CAPACITY: usize = 1_000;
pub const DEFAULT_AUDIT_STORAGE_PATH: &str = "data/audit.redb";
pub const DEFAULT_AUDIT_PAGE_SIZE: usize = 100;

// ── Customers ──────────────────────────────────────────────────────

pub const DEFAULT_CUSTOMER_STORAGE_PATH: &str = "data/customers.redb";
pub const DEFAULT_CUSTOMER_PAGE_SIZE: usize = 10;

// ── Paging ─────────────────────────────────────────────────────────

pub const DEFAULT_MAX_PAGE_SIZE: usize = 1_000;

// ── Timeouts ───────────────────────────────────────────────────────

pub const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);
