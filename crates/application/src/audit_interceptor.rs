use std::future::Future;
use std::sync::Arc;

use domain::audit::action::ActionTable;
use domain::audit::entity::{AuditCommand, AuditStatus};
use domain::audit::subject::{AuditSubject, AuditedResult};
use domain::common::error::{AuditedFailure, FailureKind};

use crate::audit_publisher::{AuditEventPublisher, AuditReceipt};

/// Wraps mutating operations and records one audit command per settled
/// outcome.
///
/// The wrapped operation's result or error is always returned unchanged.
/// Problems while building or publishing the audit command are logged and
/// discarded. Validation failures are left to the collaborator that raised
/// them. An operation that never settles (a dropped future) records nothing.
pub struct AuditInterceptor {
    publisher: Arc<AuditEventPublisher>,
    actions: ActionTable,
}

impl AuditInterceptor {
    pub fn new(publisher: Arc<AuditEventPublisher>, actions: ActionTable) -> Self {
        Self { publisher, actions }
    }

    pub fn actions(&self) -> &ActionTable {
        &self.actions
    }

    /// Run a synchronous operation under audit.
    pub fn intercept<A, R, E, F>(&self, operation: &str, arg: &A, op: F) -> Result<R, E>
    where
        A: AuditSubject + ?Sized,
        R: AuditedResult,
        E: AuditedFailure + std::fmt::Display,
        F: FnOnce() -> Result<R, E>,
    {
        let outcome = op();
        self.observe(operation, arg, &outcome);
        outcome
    }

    /// Run an asynchronous operation under audit.
    pub async fn intercept_async<A, R, E, Fut>(
        &self,
        operation: &str,
        arg: &A,
        fut: Fut,
    ) -> Result<R, E>
    where
        A: AuditSubject + ?Sized,
        R: AuditedResult,
        E: AuditedFailure + std::fmt::Display,
        Fut: Future<Output = Result<R, E>>,
    {
        let outcome = fut.await;
        self.observe(operation, arg, &outcome);
        outcome
    }

    fn observe<A, R, E>(&self, operation: &str, arg: &A, outcome: &Result<R, E>)
    where
        A: AuditSubject + ?Sized,
        R: AuditedResult,
        E: AuditedFailure + std::fmt::Display,
    {
        let action = self.actions.resolve(operation);

        let command = match outcome {
            Ok(result) => {
                let Some(payload) = serialize_payload(operation, arg) else {
                    return;
                };
                AuditCommand::new(action, AuditStatus::Success)
                    .with_entity_id(arg.subject_id().or_else(|| result.created_id()))
                    .with_request_payload(payload)
            }
            Err(err) => match err.failure_kind() {
                FailureKind::NotFound => {
                    let entity_id = arg.subject_id();
                    AuditCommand::new(action, AuditStatus::NotFound)
                        .with_entity_id(entity_id)
                        .with_request_payload(entity_id.map(|id| id.to_string()))
                }
                FailureKind::Validation => {
                    tracing::debug!(operation, error = %err, "validation failure left to its producer");
                    return;
                }
                FailureKind::General => {
                    let Some(payload) = serialize_payload(operation, arg) else {
                        return;
                    };
                    AuditCommand::new(action, AuditStatus::GeneralError)
                        .with_entity_id(arg.subject_id())
                        .with_request_payload(payload)
                }
            },
        };

        if let AuditReceipt::Dropped { reason } = self.publisher.publish_best_effort(command) {
            tracing::warn!(operation, reason = %reason, "operation outcome not audited");
        }
    }
}

fn serialize_payload<A: AuditSubject + ?Sized>(operation: &str, arg: &A) -> Option<Option<String>> {
    match arg.request_payload() {
        Ok(payload) => Some(payload),
        Err(e) => {
            tracing::warn!(operation, error = %e, "audit payload serialization failed");
            None
        }
    }
}
