use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use domain::audit::entity::AuditEvent;
use domain::audit::error::AuditError;
use domain::audit::query::AuditFilter;
use domain::common::entity::EntityId;
use domain::common::error::DomainError;
use domain::common::page::{PageRequest, PageResult};
use domain::customer::entity::{Customer, CustomerCommand};

use crate::secondary::audit_repository::{AuditEventRepository, OrderedAuditStore};
use crate::secondary::customer_repository::CustomerRepository;
use crate::secondary::metrics_port::{AuditMetrics, EntityMetrics, QueryMetrics};

/// No-op implementation of all metrics sub-traits for use in tests.
///
/// All methods inherit the default no-op implementations from the sub-traits.
pub struct NoopMetrics;

impl AuditMetrics for NoopMetrics {}
impl EntityMetrics for NoopMetrics {}
impl QueryMetrics for NoopMetrics {}

// ── Audit stores ───────────────────────────────────────────────────

/// Unbounded in-memory audit store that assigns sequential ids.
#[derive(Default)]
pub struct InMemoryAuditStore {
    events: Mutex<Vec<AuditEvent>>,
    next_id: AtomicU64,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl AuditEventRepository for InMemoryAuditStore {
    fn add(&self, event: AuditEvent) -> Result<AuditEvent, AuditError> {
        let mut events = self
            .events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let stored = event.with_id(id);
        events.push(stored.clone());
        Ok(stored)
    }

    fn find(&self, filter: &AuditFilter) -> Result<Vec<AuditEvent>, AuditError> {
        let mut found: Vec<AuditEvent> = self
            .events()
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();
        found.reverse();
        Ok(found)
    }
}

impl OrderedAuditStore for InMemoryAuditStore {
    fn find_ordered(&self, request: &PageRequest) -> Result<PageResult<AuditEvent>, AuditError> {
        Ok(request.apply(self.events()))
    }

    fn count(&self) -> Result<u64, AuditError> {
        Ok(self.events().len() as u64)
    }
}

/// Audit store whose every operation fails, counting write attempts.
#[derive(Default)]
pub struct FailingAuditStore {
    pub attempts: AtomicU32,
}

impl FailingAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::Relaxed)
    }
}

impl AuditEventRepository for FailingAuditStore {
    fn add(&self, _event: AuditEvent) -> Result<AuditEvent, AuditError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        Err(AuditError::StorageFailure("store offline".to_string()))
    }

    fn find(&self, _filter: &AuditFilter) -> Result<Vec<AuditEvent>, AuditError> {
        Err(AuditError::StorageFailure("store offline".to_string()))
    }
}

impl OrderedAuditStore for FailingAuditStore {
    fn find_ordered(&self, _request: &PageRequest) -> Result<PageResult<AuditEvent>, AuditError> {
        Err(AuditError::StorageFailure("store offline".to_string()))
    }

    fn count(&self) -> Result<u64, AuditError> {
        Err(AuditError::StorageFailure("store offline".to_string()))
    }
}

// ── Customer repository ────────────────────────────────────────────

/// In-memory customer repository keyed by sequential ids.
#[derive(Default)]
pub struct InMemoryCustomerRepository {
    rows: Mutex<Vec<Customer>>,
    next_id: AtomicU64,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CustomerRepository for InMemoryCustomerRepository {
    fn save(
        &self,
        id: Option<EntityId>,
        command: CustomerCommand,
    ) -> Result<Customer, DomainError> {
        let mut rows = self
            .rows
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let id = id.unwrap_or_else(|| EntityId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1));
        let customer = Customer::from_command(id, command);
        rows.retain(|c| c.id != id);
        rows.push(customer.clone());
        Ok(customer)
    }

    fn find_by_id(&self, id: EntityId) -> Result<Option<Customer>, DomainError> {
        let rows = self
            .rows
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(rows.iter().find(|c| c.id == id).cloned())
    }

    fn exists_by_id(&self, id: EntityId) -> Result<bool, DomainError> {
        Ok(self.find_by_id(id)?.is_some())
    }

    fn delete_by_id(&self, id: EntityId) -> Result<(), DomainError> {
        let mut rows = self
            .rows
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        rows.retain(|c| c.id != id);
        Ok(())
    }

    fn find_all(&self, request: &PageRequest) -> Result<PageResult<Customer>, DomainError> {
        let rows = self
            .rows
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        Ok(request.apply(rows))
    }
}
