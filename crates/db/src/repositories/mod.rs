//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Multi-statement operations that
//! must be atomic (pairing, session end with cascade) run inside a single
//! transaction owned by the repository method.

pub mod chat_session_repo;
pub mod match_request_repo;
pub mod message_repo;
pub mod presence_repo;
pub mod user_repo;

pub use chat_session_repo::ChatSessionRepo;
pub use match_request_repo::MatchRequestRepo;
pub use message_repo::MessageRepo;
pub use presence_repo::PresenceRepo;
pub use user_repo::UserRepo;
