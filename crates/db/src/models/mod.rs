//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Outcome enums returned by the corresponding repository where an
//!   operation has more shapes than success/failure

pub mod chat_session;
pub mod match_request;
pub mod message;
pub mod presence;
pub mod status;
pub mod user;
