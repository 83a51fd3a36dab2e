//! JSON wire encoding for notifications
//!
//! Payload shape:
//! ```text
//! {"id":"…","client_id":"…","user_id":"","message":"…","type":0,
//!  "read":false,"created_at":"2024-01-01T00:00:00Z","source":"…"}
//! ```

use super::Notification;
use crate::error::{NotificationError, Result};
use chrono::{DateTime, SecondsFormat, Utc};

/// Encode a notification to its JSON payload
pub fn encode(notification: &Notification) -> Result<Vec<u8>> {
    serde_json::to_vec(notification)
        .map_err(|source| NotificationError::SerializationFailed { source })
}

/// Decode a JSON payload produced by [`encode`] or another publisher
pub fn decode(payload: &[u8]) -> Result<Notification> {
    serde_json::from_slice(payload)
        .map_err(|source| NotificationError::DeserializationFailed { source })
}

pub fn utc_now() -> DateTime<Utc> {
    Utc::now()
}

/// `0001-01-01T00:00:00Z` in Unix seconds, the unset timestamp other
/// producers put on the wire
const ZERO_TIME_UNIX_SECS: i64 = -62_135_596_800;

/// True for timestamps that mean "unset"
pub fn is_zero_time(timestamp: &DateTime<Utc>) -> bool {
    *timestamp == DateTime::<Utc>::MIN_UTC
        || (timestamp.timestamp() == ZERO_TIME_UNIX_SECS && timestamp.timestamp_subsec_nanos() == 0)
}

/// RFC 3339 with second precision
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}
