#![forbid(unsafe_code)]

pub mod audit;
pub mod common;
pub mod customer;
