pub mod action;
pub mod entity;
pub mod error;
pub mod query;
pub mod subject;
