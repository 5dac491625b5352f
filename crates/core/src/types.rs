/// Entity identifiers are opaque strings (UUIDv7 when generated server-side).
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh, time-ordered entity identifier.
pub fn new_id() -> EntityId {
    uuid::Uuid::now_v7().to_string()
}
