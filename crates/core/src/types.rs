/// All database primary keys except chat sessions are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Chat sessions are addressed by an opaque, globally unique UUID token.
pub type SessionId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
