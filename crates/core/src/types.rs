/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Owner of a diagram (the `sub` claim of the caller's access token).
pub type UserId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
