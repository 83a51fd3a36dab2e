//! Input validation for notifications
//!
//! Pure checks; no side effects. Lengths are measured in characters.

use crate::error::{NotificationError, Result};
use crate::notification::Notification;

/// Maximum client ID length
pub const MAX_CLIENT_ID_LEN: usize = 255;
/// Maximum message length
pub const MAX_MESSAGE_LEN: usize = 10_000;
/// Maximum source label length
pub const MAX_SOURCE_LEN: usize = 100;

fn check_bounded(field: &'static str, value: &str, max: usize) -> Result<()> {
    if value.is_empty() {
        return Err(NotificationError::EmptyField { field });
    }
    if value.chars().count() > max {
        return Err(NotificationError::FieldTooLong { field, max });
    }
    Ok(())
}

/// Client IDs become a subject token, so spaces are rejected outright
pub fn validate_client_id(client_id: &str) -> Result<()> {
    check_bounded("clientID", client_id, MAX_CLIENT_ID_LEN)?;
    if client_id.contains(' ') {
        return Err(NotificationError::ContainsSpaces { field: "clientID" });
    }
    Ok(())
}

pub fn validate_message(message: &str) -> Result<()> {
    check_bounded("message", message, MAX_MESSAGE_LEN)
}

pub fn validate_source(source: &str) -> Result<()> {
    check_bounded("source", source, MAX_SOURCE_LEN)
}

/// Validate a whole record
///
/// Checks run in field order: client ID, message, source. The first failure
/// is returned.
pub fn validate_notification(notification: Option<&Notification>) -> Result<()> {
    let notification = notification.ok_or(NotificationError::MissingNotification)?;
    validate_client_id(&notification.client_id)?;
    validate_message(&notification.message)?;
    validate_source(&notification.source)?;
    Ok(())
}
