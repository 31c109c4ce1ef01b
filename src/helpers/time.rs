use chrono::{DateTime, Utc};
use tokio::time::Instant;

pub fn now_i64() -> i64 {
    Utc::now().timestamp()
}

/// Milliseconds since the UNIX epoch, the unit bitable date fields use.
pub fn to_epoch_millis(value: &DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

pub fn get_instant() -> Instant {
    Instant::now()
}
