use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Notification category, encoded on the wire as an integer 0-4
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum NotificationType {
    #[default]
    Info,
    Warning,
    Error,
    Success,
    System,
}

impl From<NotificationType> for i32 {
    fn from(kind: NotificationType) -> Self {
        match kind {
            NotificationType::Info => 0,
            NotificationType::Warning => 1,
            NotificationType::Error => 2,
            NotificationType::Success => 3,
            NotificationType::System => 4,
        }
    }
}

impl TryFrom<i32> for NotificationType {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, String> {
        match value {
            0 => Ok(NotificationType::Info),
            1 => Ok(NotificationType::Warning),
            2 => Ok(NotificationType::Error),
            3 => Ok(NotificationType::Success),
            4 => Ok(NotificationType::System),
            other => Err(format!("unknown notification type {other}")),
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Success => "success",
            Self::System => "system",
        };
        f.write_str(name)
    }
}

/// A message addressed to a client
///
/// Empty strings mean "unset" for `id`, `client_id` and `user_id`, matching
/// what other-language consumers of the same payload expect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    pub id: String,
    pub client_id: String,
    pub user_id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub read: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub source: String,
}

impl Notification {
    /// Start a record with the required fields set
    pub fn new(
        client_id: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationType,
        source: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            message: message.into(),
            kind,
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn mark_as_read(&mut self) {
        self.read = true;
    }

    /// True when user, message and source are all present
    ///
    /// Used by downstream consumers that address users rather than clients;
    /// publishing validates with [`crate::validation::validate_notification`].
    pub fn is_valid(&self) -> bool {
        !self.user_id.is_empty() && !self.message.is_empty() && !self.source.is_empty()
    }
}

/// A notification tagged with an event ID for server-sent-event streams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub notification: Notification,
    pub event_id: String,
}

impl NotificationEvent {
    pub fn new(notification: Notification, event_id: impl Into<String>) -> Self {
        Self {
            notification,
            event_id: event_id.into(),
        }
    }
}
