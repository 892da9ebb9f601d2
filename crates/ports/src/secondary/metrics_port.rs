// Focused sub-traits for recording Prometheus metrics.
//
// All methods take `&self` because the underlying implementation uses
// atomic operations (interior mutability via `prometheus-client`).
//
// Default implementations are no-ops, allowing test mocks to implement
// only the sub-traits relevant to the service under test.

// ── Audit pipeline metrics ─────────────────────────────────────────

pub trait AuditMetrics: Send + Sync {
    /// Record an audit event durably stored, by action tag and status.
    fn record_audit_event(&self, _action: &str, _status: &str) {}

    /// Record an audit event that could not be stored.
    fn record_audit_dropped(&self, _reason: &str) {}
}

// ── Managed entity metrics ─────────────────────────────────────────

pub trait EntityMetrics: Send + Sync {
    /// Record a customer mutation and its outcome (`success`, `not_found`, ...).
    fn record_customer_operation(&self, _operation: &str, _outcome: &str) {}
}

// ── Query metrics ──────────────────────────────────────────────────

pub trait QueryMetrics: Send + Sync {
    /// Record a paginated query against a collection.
    fn record_page_query(&self, _collection: &str, _outcome: &str) {}
}

// ── Composite super-trait ──────────────────────────────────────────

/// Unified metrics port composing all sub-traits.
///
/// Services accept `Arc<dyn MetricsPort>` for full access.
pub trait MetricsPort: AuditMetrics + EntityMetrics + QueryMetrics {}

impl<T> MetricsPort for T where T: AuditMetrics + EntityMetrics + QueryMetrics {}
