pub mod audit_handler;
pub mod customer_handler;
pub mod error;
pub mod health_handler;
pub mod metrics_handler;
pub mod openapi;
pub mod pagination;
pub mod router;
pub mod server;
pub mod state;
