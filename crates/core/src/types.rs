//! Shared type aliases.

/// UTC timestamp used across the workspace.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Epoch-milliseconds timestamp carried inside value objects, where a full
/// `DateTime` would force every comparison site through chrono.
pub type EpochMillis = i64;

/// Current time as epoch milliseconds.
pub fn now_millis() -> EpochMillis {
    chrono::Utc::now().timestamp_millis()
}
