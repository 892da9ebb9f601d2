use std::path::Path;

use domain::common::entity::EntityId;
use domain::common::error::DomainError;
use domain::common::page::{PageRequest, PageResult};
use domain::customer::entity::{Customer, CustomerCommand};
use ports::secondary::customer_repository::CustomerRepository;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

/// redb table: key = customer id, value = JSON-serialized `Customer`.
const CUSTOMER_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("customers");

/// Id allocator. Kept apart from the rows so deleted ids are never reused.
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("customer_sequence");
const SEQUENCE_KEY: &str = "last_id";

/// Customer repository backed by redb.
///
/// Every write is a single redb write transaction; redb serializes writers,
/// so id allocation and insert commit atomically.
pub struct RedbCustomerRepository {
    db: Database,
}

impl RedbCustomerRepository {
    /// Open (or create) a redb database at `path`.
    pub fn open(path: &Path) -> Result<Self, DomainError> {
        let db = Database::create(path)
            .map_err(|e| DomainError::StorageFailure(format!("redb open failed: {e}")))?;

        let txn = db
            .begin_write()
            .map_err(|e| DomainError::StorageFailure(format!("redb txn begin: {e}")))?;
        {
            let _rows = txn
                .open_table(CUSTOMER_TABLE)
                .map_err(|e| DomainError::StorageFailure(format!("redb table create: {e}")))?;
            let _seq = txn
                .open_table(SEQUENCE_TABLE)
                .map_err(|e| DomainError::StorageFailure(format!("redb table create: {e}")))?;
        }
        txn.commit()
            .map_err(|e| DomainError::StorageFailure(format!("redb commit: {e}")))?;

        tracing::info!(path = %path.display(), "customer store opened");

        Ok(Self { db })
    }
}

fn decode_customer(bytes: &[u8]) -> Result<Customer, DomainError> {
    serde_json::from_slice(bytes)
        .map_err(|e| DomainError::StorageFailure(format!("corrupt customer row: {e}")))
}

impl CustomerRepository for RedbCustomerRepository {
    fn save(
        &self,
        id: Option<EntityId>,
        command: CustomerCommand,
    ) -> Result<Customer, DomainError> {
        let txn = self
            .db
            .begin_write()
            .map_err(|e| DomainError::StorageFailure(format!("redb write txn: {e}")))?;
        let customer = {
            let id = match id {
                Some(id) => id,
                None => {
                    let mut seq = txn.open_table(SEQUENCE_TABLE).map_err(|e| {
                        DomainError::StorageFailure(format!("redb sequence table: {e}"))
                    })?;
                    let last = seq
                        .get(SEQUENCE_KEY)
                        .map_err(|e| DomainError::StorageFailure(format!("redb sequence: {e}")))?
                        .map_or(0, |v| v.value());
                    seq.insert(SEQUENCE_KEY, last + 1)
                        .map_err(|e| DomainError::StorageFailure(format!("redb sequence: {e}")))?;
                    EntityId(last + 1)
                }
            };

            let customer = Customer::from_command(id, command);
            let value = serde_json::to_vec(&customer)
                .map_err(|e| DomainError::StorageFailure(format!("serialize: {e}")))?;

            let mut table = txn
                .open_table(CUSTOMER_TABLE)
                .map_err(|e| DomainError::StorageFailure(format!("redb write table: {e}")))?;
            table
                .insert(id.value(), value.as_slice())
                .map_err(|e| DomainError::StorageFailure(format!("redb insert: {e}")))?;
            customer
        };
        txn.commit()
            .map_err(|e| DomainError::StorageFailure(format!("redb write commit: {e}")))?;

        tracing::debug!(id = %customer.id, "customer saved");
        Ok(customer)
    }

    fn find_by_id(&self, id: EntityId) -> Result<Option<Customer>, DomainError> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| DomainError::StorageFailure(format!("redb read txn: {e}")))?;
        let table = txn
            .open_table(CUSTOMER_TABLE)
            .map_err(|e| DomainError::StorageFailure(format!("redb read table: {e}")))?;
        table
            .get(id.value())
            .map_err(|e| DomainError::StorageFailure(format!("redb get: {e}")))?
            .map(|v| decode_customer(v.value()))
            .transpose()
    }

    fn exists_by_id(&self, id: EntityId) -> Result<bool, DomainError> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| DomainError::StorageFailure(format!("redb read txn: {e}")))?;
        let table = txn
            .open_table(CUSTOMER_TABLE)
            .map_err(|e| DomainError::StorageFailure(format!("redb read table: {e}")))?;
        Ok(table
            .get(id.value())
            .map_err(|e| DomainError::StorageFailure(format!("redb get: {e}")))?
            .is_some())
    }

    fn delete_by_id(&self, id: EntityId) -> Result<(), DomainError> {
        let txn = self
            .db
            .begin_write()
            .map_err(|e| DomainError::StorageFailure(format!("redb delete txn: {e}")))?;
        {
            let mut table = txn
                .open_table(CUSTOMER_TABLE)
                .map_err(|e| DomainError::StorageFailure(format!("redb delete table: {e}")))?;
            table
                .remove(id.value())
                .map_err(|e| DomainError::StorageFailure(format!("redb remove: {e}")))?;
        }
        txn.commit()
            .map_err(|e| DomainError::StorageFailure(format!("redb delete commit: {e}")))?;
        Ok(())
    }

    fn find_all(&self, request: &PageRequest) -> Result<PageResult<Customer>, DomainError> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| DomainError::StorageFailure(format!("redb read txn: {e}")))?;
        let table = txn
            .open_table(CUSTOMER_TABLE)
            .map_err(|e| DomainError::StorageFailure(format!("redb read table: {e}")))?;
        let customers = table
            .iter()
            .map_err(|e| DomainError::StorageFailure(format!("redb iter: {e}")))?
            .filter_map(Result::ok)
            .map(|(_k, v)| decode_customer(v.value()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(request.apply(customers))
    }
}
