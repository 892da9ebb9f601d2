#![forbid(unsafe_code)]

pub mod audit_interceptor;
pub mod audit_publisher;
pub mod audit_query_service;
pub mod customer_service_impl;
