//! Domain error types for the notification SDK
//!
//! Every failure the SDK can produce is a variant of [`NotificationError`].
//! Variants carry structured context; [`NotificationError::code`] maps each
//! one onto the numeric classification consumers switch on.
//!
//! main.rs is the ONLY module allowed to use anyhow::Result (process boundary).
//! All library code returns Result<T, NotificationError>.

use std::fmt;
use thiserror::Error;

/// Boxed transport error, as returned by [`crate::nats::Transport`] implementations
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Convenience alias used across the crate
pub type Result<T, E = NotificationError> = std::result::Result<T, E>;

/// Numeric error classification
///
/// Values follow HTTP status semantics so they can be surfaced unchanged by
/// API layers sitting on top of the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotFound,
    InvalidArguments,
    AlreadyExists,
    PermissionDenied,
    Unauthorized,
    Internal,
}

impl ErrorCode {
    /// Numeric value of the classification
    pub fn as_i32(self) -> i32 {
        match self {
            Self::NotFound => 404,
            Self::InvalidArguments => 400,
            Self::AlreadyExists => 409,
            Self::PermissionDenied => 403,
            Self::Unauthorized => 401,
            Self::Internal => 500,
        }
    }

    /// Reverse of [`ErrorCode::as_i32`]
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            404 => Some(Self::NotFound),
            400 => Some(Self::InvalidArguments),
            409 => Some(Self::AlreadyExists),
            403 => Some(Self::PermissionDenied),
            401 => Some(Self::Unauthorized),
            500 => Some(Self::Internal),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotFound => "not_found",
            Self::InvalidArguments => "invalid_arguments",
            Self::AlreadyExists => "already_exists",
            Self::PermissionDenied => "permission_denied",
            Self::Unauthorized => "unauthorized",
            Self::Internal => "internal",
        };
        write!(f, "{name} ({})", self.as_i32())
    }
}

/// Notification SDK errors
///
/// Example:
/// ```text
/// NotificationError::FieldTooLong { field: "source", max: 100 }
/// → "source cannot exceed 100 characters" (code 400)
/// ```
#[derive(Error, Debug)]
pub enum NotificationError {
    /// A required field was empty
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    /// A bounded field exceeded its maximum length in characters
    #[error("{field} cannot exceed {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    /// A field that becomes a subject token contained a space
    #[error("{field} cannot contain spaces")]
    ContainsSpaces { field: &'static str },

    /// A custom publish was called without a record
    #[error("notification cannot be nil")]
    MissingNotification,

    /// The built subject is not usable for routing
    #[error("invalid subject: {subject}")]
    InvalidSubject { subject: String },

    /// Every connect attempt failed
    #[error("failed to connect to NATS after {attempts} attempt(s): {source}")]
    ConnectFailed {
        attempts: u32,
        #[source]
        source: BoxError,
    },

    /// Encoding a notification to JSON failed
    #[error("failed to marshal notification: {source}")]
    SerializationFailed {
        #[source]
        source: serde_json::Error,
    },

    /// Decoding a notification from JSON failed
    #[error("failed to unmarshal notification: {source}")]
    DeserializationFailed {
        #[source]
        source: serde_json::Error,
    },

    /// The publish call on the connection failed
    #[error("failed to publish notification to '{subject}': {source}")]
    PublishFailed {
        subject: String,
        #[source]
        source: BoxError,
    },

    /// The publisher was closed before the call
    #[error("publisher is closed")]
    Closed,

    /// Configuration error (environment variable missing or invalid)
    #[error("configuration error: {0}")]
    Config(String),

    /// Caller-classified error for codes the SDK never produces itself
    #[error("{message}")]
    Other { code: ErrorCode, message: String },
}

impl NotificationError {
    /// Build an error with an explicit classification and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Other {
            code,
            message: message.into(),
        }
    }

    /// Numeric classification of this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyField { .. }
            | Self::FieldTooLong { .. }
            | Self::ContainsSpaces { .. }
            | Self::MissingNotification
            | Self::InvalidSubject { .. } => ErrorCode::InvalidArguments,
            Self::ConnectFailed { .. }
            | Self::SerializationFailed { .. }
            | Self::DeserializationFailed { .. }
            | Self::PublishFailed { .. }
            | Self::Closed
            | Self::Config(_) => ErrorCode::Internal,
            Self::Other { code, .. } => *code,
        }
    }

    /// True for validation failures the caller can fix by changing input
    pub fn is_invalid_argument(&self) -> bool {
        self.code() == ErrorCode::InvalidArguments
    }

    /// Returns a static label string suitable for metrics.
    ///
    /// Used as the `error_type` label on the
    /// `notification_publish_failures_total` counter.
    pub fn error_type_label(&self) -> &'static str {
        match self {
            Self::EmptyField { .. } => "empty_field",
            Self::FieldTooLong { .. } => "field_too_long",
            Self::ContainsSpaces { .. } => "contains_spaces",
            Self::MissingNotification => "missing_notification",
            Self::InvalidSubject { .. } => "invalid_subject",
            Self::ConnectFailed { .. } => "nats_connection",
            Self::SerializationFailed { .. } => "serialization",
            Self::DeserializationFailed { .. } => "deserialization",
            Self::PublishFailed { .. } => "nats_publish",
            Self::Closed => "closed",
            Self::Config(_) => "config",
            Self::Other { .. } => "other",
        }
    }
}
