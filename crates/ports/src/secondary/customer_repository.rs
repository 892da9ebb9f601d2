use domain::common::entity::EntityId;
use domain::common::error::DomainError;
use domain::common::page::{PageRequest, PageResult};
use domain::customer::entity::{Customer, CustomerCommand};

/// Persistence collaborator for customers.
pub trait CustomerRepository: Send + Sync {
    /// Insert (`id == None`) or overwrite a customer. Returns the stored row.
    fn save(&self, id: Option<EntityId>, command: CustomerCommand)
    -> Result<Customer, DomainError>;

    fn find_by_id(&self, id: EntityId) -> Result<Option<Customer>, DomainError>;

    fn exists_by_id(&self, id: EntityId) -> Result<bool, DomainError>;

    fn delete_by_id(&self, id: EntityId) -> Result<(), DomainError>;

    fn find_all(&self, request: &PageRequest) -> Result<PageResult<Customer>, DomainError>;
}
