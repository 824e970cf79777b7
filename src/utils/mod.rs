pub mod error;
pub mod validation;

pub use error::*;

/// Current time as Unix epoch milliseconds, the unit every `created_at` uses.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
