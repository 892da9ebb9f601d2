use ports::secondary::metrics_port::{AuditMetrics, EntityMetrics, QueryMetrics};
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

// ── Label types ─────────────────────────────────────────────────────

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct AuditEventLabels {
    pub action: String,
    pub status: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ReasonLabels {
    pub reason: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct OperationLabels {
    pub operation: String,
    pub outcome: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct QueryLabels {
    pub collection: String,
    pub outcome: String,
}

// ── Service metrics registry ────────────────────────────────────────

/// Prometheus metrics registry for the service.
///
/// Metric families use atomics, so recording only needs `&self`. The
/// registry is not `Clone`; share it through an `Arc`.
pub struct ServiceMetrics {
    registry: Registry,
    pub audit_events_recorded_total: Family<AuditEventLabels, Counter>,
    pub audit_events_dropped_total: Family<ReasonLabels, Counter>,
    pub customer_operations_total: Family<OperationLabels, Counter>,
    pub page_queries_total: Family<QueryLabels, Counter>,
}

impl ServiceMetrics {
    /// Create a registry with every metric registered under the
    /// `trailkeeper` prefix.
    pub fn new() -> Self {
        let mut registry = Registry::with_prefix("trailkeeper");

        let audit_events_recorded_total = Family::<AuditEventLabels, Counter>::default();
        registry.register(
            "audit_events_recorded",
            "Audit events durably stored, by action and status",
            audit_events_recorded_total.clone(),
        );

        let audit_events_dropped_total = Family::<ReasonLabels, Counter>::default();
        registry.register(
            "audit_events_dropped",
            "Audit events that could not be stored",
            audit_events_dropped_total.clone(),
        );

        let customer_operations_total = Family::<OperationLabels, Counter>::default();
        registry.register(
            "customer_operations",
            "Customer mutations by operation and outcome",
            customer_operations_total.clone(),
        );

        let page_queries_total = Family::<QueryLabels, Counter>::default();
        registry.register(
            "page_queries",
            "Paginated queries by collection and outcome",
            page_queries_total.clone(),
        );

        Self {
            registry,
            audit_events_recorded_total,
            audit_events_dropped_total,
            customer_operations_total,
            page_queries_total,
        }
    }

    /// Encode all metrics in `OpenMetrics` text format.
    pub fn encode(&self) -> Result<String, std::fmt::Error> {
        let mut buffer = String::new();
        prometheus_client::encoding::text::encode(&mut buffer, &self.registry)?;
        Ok(buffer)
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

// ── Sub-trait implementations ──────────────────────────────────────

impl AuditMetrics for ServiceMetrics {
    fn record_audit_event(&self, action: &str, status: &str) {
        self.audit_events_recorded_total
            .get_or_create(&AuditEventLabels {
                action: action.to_string(),
                status: status.to_string(),
            })
            .inc();
    }

    fn record_audit_dropped(&self, reason: &str) {
        self.audit_events_dropped_total
            .get_or_create(&ReasonLabels {
                reason: reason.to_string(),
            })
            .inc();
    }
}

impl EntityMetrics for ServiceMetrics {
    fn record_customer_operation(&self, operation: &str, outcome: &str) {
        self.customer_operations_total
            .get_or_create(&OperationLabels {
                operation: operation.to_string(),
                outcome: outcome.to_string(),
            })
            .inc();
    }
}

impl QueryMetrics for ServiceMetrics {
    fn record_page_query(&self, collection: &str, outcome: &str) {
        self.page_queries_total
            .get_or_create(&QueryLabels {
                collection: collection.to_string(),
                outcome: outcome.to_string(),
            })
            .inc();
    }
}
