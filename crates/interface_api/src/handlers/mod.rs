//! Request handlers, one module per domain

pub mod billing;
pub mod catalog;
pub mod customers;
pub mod health;
pub mod updates;
