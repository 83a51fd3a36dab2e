//! Publisher port
//!
//! Services depend on this trait rather than on a concrete publisher so the
//! bus can be swapped or faked.

use crate::error::Result;
use crate::notification::{Notification, NotificationType};
use async_trait::async_trait;

#[async_trait]
pub trait NotificationPublisherPort: Send + Sync {
    /// Build and publish a notification from its required fields
    async fn publish_notification(
        &self,
        client_id: &str,
        message: &str,
        kind: NotificationType,
        source: &str,
    ) -> Result<()>;

    /// Publish a caller-built record, filling unset `client_id`, `id` and
    /// `created_at` in place
    async fn publish_custom_notification(
        &self,
        client_id: &str,
        notification: Option<&mut Notification>,
    ) -> Result<()>;

    /// Release the underlying connection
    async fn close(&self) -> Result<()>;
}
