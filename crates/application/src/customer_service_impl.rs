use std::sync::Arc;

use domain::audit::entity::{AuditCommand, AuditStatus};
use domain::audit::subject::json_payload;
use domain::common::entity::EntityId;
use domain::common::error::DomainError;
use domain::common::page::PageResult;
use domain::common::sort::decode_page_request;
use domain::customer::entity::{Customer, CustomerCommand};
use ports::secondary::customer_repository::CustomerRepository;
use ports::secondary::metrics_port::MetricsPort;

use crate::audit_interceptor::AuditInterceptor;
use crate::audit_publisher::AuditEventPublisher;

const CREATE: &str = "create_customer";
const UPDATE: &str = "update_customer";
const DELETE: &str = "delete_customer";

/// Customer management. Every mutation runs under the audit interceptor.
///
/// Validation happens inside the audited operation. The interceptor skips
/// validation failures, so this service publishes them itself as
/// `VALIDATION_ERROR` events.
pub struct CustomerAppService {
    repository: Arc<dyn CustomerRepository>,
    interceptor: Arc<AuditInterceptor>,
    publisher: Arc<AuditEventPublisher>,
    metrics: Arc<dyn MetricsPort>,
}

impl CustomerAppService {
    pub fn new(
        repository: Arc<dyn CustomerRepository>,
        interceptor: Arc<AuditInterceptor>,
        publisher: Arc<AuditEventPublisher>,
        metrics: Arc<dyn MetricsPort>,
    ) -> Self {
        Self {
            repository,
            interceptor,
            publisher,
            metrics,
        }
    }

    pub fn create_customer(&self, command: CustomerCommand) -> Result<Customer, DomainError> {
        let outcome = self.interceptor.intercept(CREATE, &command, || {
            command.validate()?;
            self.repository.save(None, command.clone())
        });
        self.settle(CREATE, None, &command, outcome)
    }

    pub fn update_customer(
        &self,
        id: EntityId,
        command: CustomerCommand,
    ) -> Result<Customer, DomainError> {
        let outcome = self.interceptor.intercept(UPDATE, &(id, &command), || {
            command.validate()?;
            if !self.repository.exists_by_id(id)? {
                return Err(DomainError::NotFound(format!("customer {id}")));
            }
            self.repository.save(Some(id), command.clone())
        });
        self.settle(UPDATE, Some(id), &command, outcome)
    }

    pub fn delete_customer(&self, id: EntityId) -> Result<(), DomainError> {
        let outcome = self.interceptor.intercept(DELETE, &id, || {
            if !self.repository.exists_by_id(id)? {
                return Err(DomainError::NotFound(format!("customer {id}")));
            }
            self.repository.delete_by_id(id)
        });
        self.record_outcome(DELETE, &outcome);
        outcome
    }

    pub fn get_customer(&self, id: EntityId) -> Result<Customer, DomainError> {
        self.repository
            .find_by_id(id)?
            .ok_or_else(|| DomainError::NotFound(format!("customer {id}")))
    }

    /// Decode the sort spec and read one page of customers.
    pub fn get_customers(
        &self,
        raw_sort: Option<&str>,
        page_index: usize,
        page_size: usize,
    ) -> Result<PageResult<Customer>, DomainError> {
        let result = decode_page_request::<Customer>(raw_sort, page_index, page_size)
            .and_then(|request| self.repository.find_all(&request));
        self.metrics
            .record_page_query("customers", if result.is_ok() { "ok" } else { "error" });
        result
    }

    fn settle<R>(
        &self,
        operation: &str,
        id: Option<EntityId>,
        command: &CustomerCommand,
        outcome: Result<R, DomainError>,
    ) -> Result<R, DomainError> {
        if let Err(DomainError::Validation(_)) = outcome {
            self.publish_validation_failure(operation, id, command);
        }
        self.record_outcome(operation, &outcome);
        outcome
    }

    fn publish_validation_failure(
        &self,
        operation: &str,
        id: Option<EntityId>,
        command: &CustomerCommand,
    ) {
        let payload = match json_payload(command) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(operation, error = %e, "validation audit payload serialization failed");
                None
            }
        };
        let action = self.interceptor.actions().resolve(operation);
        let _ = self.publisher.publish_best_effort(
            AuditCommand::new(action, AuditStatus::ValidationError)
                .with_entity_id(id.map(EntityId::value))
                .with_request_payload(payload),
        );
    }

    fn record_outcome<R>(&self, operation: &str, outcome: &Result<R, DomainError>) {
        let label = match outcome {
            Ok(_) => "success",
            Err(DomainError::NotFound(_)) => "not_found",
            Err(DomainError::Validation(_)) => "validation_error",
            Err(_) => "error",
        };
        self.metrics.record_customer_operation(operation, label);
    }
}
