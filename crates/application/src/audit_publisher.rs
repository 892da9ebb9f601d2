use std::sync::Arc;

use domain::audit::entity::{AuditCommand, AuditEvent};
use domain::audit::error::AuditError;
use ports::secondary::audit_repository::AuditEventRepository;
use ports::secondary::metrics_port::MetricsPort;

/// Outcome of a best-effort publish. A dropped audit has already been
/// logged; callers never turn it into a business error.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditReceipt {
    Recorded(AuditEvent),
    Dropped { reason: String },
}

impl AuditReceipt {
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded(_))
    }
}

/// Normalizes audit commands into events and routes them to storage.
///
/// Every command becomes exactly one event written to the durable store.
/// When a live cache is attached, the event is mirrored there first,
/// regardless of whether the durable write later succeeds.
pub struct AuditEventPublisher {
    durable: Arc<dyn AuditEventRepository>,
    live_cache: Option<Arc<dyn AuditEventRepository>>,
    metrics: Arc<dyn MetricsPort>,
}

impl AuditEventPublisher {
    pub fn new(durable: Arc<dyn AuditEventRepository>, metrics: Arc<dyn MetricsPort>) -> Self {
        Self {
            durable,
            live_cache: None,
            metrics,
        }
    }

    /// Attach the in-memory ring of recent events.
    #[must_use]
    pub fn with_live_cache(mut self, cache: Arc<dyn AuditEventRepository>) -> Self {
        self.live_cache = Some(cache);
        self
    }

    pub fn has_live_cache(&self) -> bool {
        self.live_cache.is_some()
    }

    /// Publish a command. Durable store failures propagate.
    pub fn publish(&self, command: AuditCommand) -> Result<AuditEvent, AuditError> {
        let event = AuditEvent::from_command(command);

        if let Some(ref cache) = self.live_cache
            && let Err(e) = cache.add(event.clone())
        {
            tracing::warn!(error = %e, action = %event.event_type, "live audit cache write failed");
        }

        match self.durable.add(event) {
            Ok(stored) => {
                self.metrics
                    .record_audit_event(&stored.event_type, stored.status().unwrap_or(""));
                tracing::debug!(
                    id = ?stored.id,
                    action = %stored.event_type,
                    status = stored.status().unwrap_or(""),
                    "audit event saved"
                );
                Ok(stored)
            }
            Err(e) => {
                self.metrics.record_audit_dropped("storage_failure");
                Err(e)
            }
        }
    }

    /// Publish a command, logging and discarding any failure.
    pub fn publish_best_effort(&self, command: AuditCommand) -> AuditReceipt {
        let action = command.action.clone();
        let status = command.status;
        match self.publish(command) {
            Ok(event) => AuditReceipt::Recorded(event),
            Err(e) => {
                tracing::warn!(error = %e, action = %action, status = %status, "audit event dropped");
                AuditReceipt::Dropped {
                    reason: e.to_string(),
                }
            }
        }
    }
}
