use std::sync::Arc;

use domain::audit::entity::AuditEvent;
use domain::audit::query::AuditFilter;
use domain::common::error::DomainError;
use domain::common::page::PageResult;
use domain::common::sort::decode_page_request;
use ports::secondary::audit_repository::{AuditEventRepository, OrderedAuditStore};
use ports::secondary::metrics_port::MetricsPort;

/// Read side of the audit trail.
///
/// Paginated ordered reads and filtered lookups are separate operations;
/// filters never apply to a paginated read.
pub struct AuditQueryService {
    store: Arc<dyn OrderedAuditStore>,
    live_cache: Option<Arc<dyn AuditEventRepository>>,
    metrics: Arc<dyn MetricsPort>,
}

impl AuditQueryService {
    pub fn new(store: Arc<dyn OrderedAuditStore>, metrics: Arc<dyn MetricsPort>) -> Self {
        Self {
            store,
            live_cache: None,
            metrics,
        }
    }

    /// Attach the in-memory ring of recent events for live lookups.
    #[must_use]
    pub fn with_live_cache(mut self, cache: Arc<dyn AuditEventRepository>) -> Self {
        self.live_cache = Some(cache);
        self
    }

    /// Decode the sort spec and read one page from the durable store.
    pub fn query(
        &self,
        raw_sort: Option<&str>,
        page_index: usize,
        page_size: usize,
    ) -> Result<PageResult<AuditEvent>, DomainError> {
        let result = decode_page_request::<AuditEvent>(raw_sort, page_index, page_size)
            .and_then(|request| self.store.find_ordered(&request).map_err(DomainError::from));
        self.metrics.record_page_query(
            "audit_events",
            if result.is_ok() { "ok" } else { "error" },
        );
        result
    }

    /// Filtered lookup against the durable store, newest first.
    pub fn search(&self, filter: &AuditFilter) -> Result<Vec<AuditEvent>, DomainError> {
        Ok(self.store.find(filter)?)
    }

    /// Filtered lookup against the live cache of recent events.
    pub fn live(&self, filter: &AuditFilter) -> Result<Vec<AuditEvent>, DomainError> {
        let cache = self.live_cache.as_ref().ok_or_else(|| {
            DomainError::StorageFailure("no live audit cache configured".to_string())
        })?;
        Ok(cache.find(filter)?)
    }

    /// Total number of durably stored events.
    pub fn stored_event_count(&self) -> Result<u64, DomainError> {
        Ok(self.store.count()?)
    }
}
