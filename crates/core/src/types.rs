/// Opaque identifier of a persisted editor state (e.g. `virt1vdb.view`).
pub type StateId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
