//! HTTP handlers, grouped by resource.

pub mod matchmaking;
pub mod message;
pub mod presence;
pub mod session;
