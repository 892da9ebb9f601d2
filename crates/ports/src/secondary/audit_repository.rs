use domain::audit::entity::AuditEvent;
use domain::audit::error::AuditError;
use domain::audit::query::AuditFilter;
use domain::common::page::{PageRequest, PageResult};

/// Shared write/lookup capability of every audit event store.
///
/// Implemented by the bounded in-memory ring and by the durable store.
/// The trait is object-safe for use behind `Arc<dyn AuditEventRepository>`.
pub trait AuditEventRepository: Send + Sync {
    /// Append an event. Returns the event as stored (with its id, when the
    /// store assigns one).
    fn add(&self, event: AuditEvent) -> Result<AuditEvent, AuditError>;

    /// Return every held event matching all active filters.
    fn find(&self, filter: &AuditFilter) -> Result<Vec<AuditEvent>, AuditError>;
}

/// Durable store extension: sorted, paginated read-back.
///
/// Filters are not combined with ordered reads; `total_elements` always
/// counts every stored event.
pub trait OrderedAuditStore: AuditEventRepository {
    fn find_ordered(&self, request: &PageRequest) -> Result<PageResult<AuditEvent>, AuditError>;

    /// Total number of stored events.
    fn count(&self) -> Result<u64, AuditError>;
}
