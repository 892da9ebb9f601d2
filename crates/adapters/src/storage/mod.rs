pub mod redb_audit_store;
pub mod redb_customer_store;
pub mod ring_audit_store;
