use std::sync::Arc;
use std::time::Instant;

use application::audit_query_service::AuditQueryService;
use application::customer_service_impl::CustomerAppService;
use infrastructure::metrics::ServiceMetrics;

/// Page sizes applied by the REST handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingDefaults {
    pub audit_page_size: usize,
    pub customer_page_size: usize,
    /// Requested sizes above this are clamped.
    pub max_page_size: usize,
}

impl Default for PagingDefaults {
    fn default() -> Self {
        Self {
            audit_page_size: 100,
            customer_page_size: 10,
            max_page_size: 1_000,
        }
    }
}

impl PagingDefaults {
    pub fn clamp(&self, requested: Option<usize>, default: usize) -> usize {
        requested.unwrap_or(default).min(self.max_page_size)
    }
}

/// Shared application state for the REST API server.
///
/// Passed to Axum handlers via `State(Arc<AppState>)`.
pub struct AppState {
    pub metrics: Arc<ServiceMetrics>,
    pub start_time: Instant,
    pub version: &'static str,
    pub audit_query: Arc<AuditQueryService>,
    pub customers: Arc<CustomerAppService>,
    pub paging: PagingDefaults,
}

impl AppState {
    pub fn new(
        metrics: Arc<ServiceMetrics>,
        audit_query: Arc<AuditQueryService>,
        customers: Arc<CustomerAppService>,
    ) -> Self {
        Self {
            metrics,
            start_time: Instant::now(),
            version: env!("CARGO_PKG_VERSION"),
            audit_query,
            customers,
            paging: PagingDefaults::default(),
        }
    }

    #[must_use]
    pub fn with_paging(mut self, paging: PagingDefaults) -> Self {
        self.paging = paging;
        self
    }
}
