pub mod audit_repository;
pub mod customer_repository;
pub mod metrics_port;
