//! Shared domain types, errors, and policy constants for Heart Link.

pub mod error;
pub mod policy;
pub mod types;
