//! Notification SDK
//!
//! Publishes client notifications to NATS:
//! - Validates client ID, message and source
//! - Fills identifiers and timestamps
//! - Encodes notifications as JSON
//! - Routes each one to `{prefix}.{client_id}`
//!
//! ```rust,ignore
//! use notification_sdk::{NotificationPublisher, NotificationType};
//!
//! let publisher = NotificationPublisher::connect("nats://127.0.0.1:4222", "notifications").await?;
//! publisher
//!     .publish_notification("client-123", "Build finished", NotificationType::Success, "ci")
//!     .await?;
//! publisher.close().await?;
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod nats;
pub mod notification;
pub mod port;
pub mod reporter;
pub mod subject;
pub mod validation;

pub use config::PublisherConfig;
pub use error::{ErrorCode, NotificationError, Result};
pub use nats::{ConnectConfig, ConnectionStatus, NatsTransport, NotificationPublisher, Transport};
pub use notification::{
    Notification, NotificationEvent, NotificationType, OrganizationNotificationPreferences,
    WorkflowEmailPreference,
};
pub use port::NotificationPublisherPort;
pub use reporter::{ErrorReporter, NoopReporter, TracingReporter};
