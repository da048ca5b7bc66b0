/// User primary keys are UUIDs generated by the service, not by the database.
pub type UserId = uuid::Uuid;

/// Session primary keys.
pub type SessionId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
