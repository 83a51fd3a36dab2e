//! NATS notification publisher
//!
//! Validates notifications, fills defaults, encodes them as JSON and
//! publishes them on `{prefix}.{client_id}`.

use super::connection::{ConnectConfig, ConnectionStatus};
use super::transport::{NatsTransport, Transport};
use crate::error::{NotificationError, Result};
use crate::metrics::{record_failure, record_published};
use crate::notification::{encode, is_zero_time, utc_now, Notification, NotificationType};
use crate::port::NotificationPublisherPort;
use crate::reporter::{default_reporter, ErrorReporter};
use crate::subject;
use crate::validation;
use async_nats::ConnectOptions;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Publishes notifications to per-client subjects
pub struct NotificationPublisher<T: Transport = NatsTransport> {
    transport: T,
    subject_prefix: String,
    reporter: Arc<dyn ErrorReporter>,
    closed: AtomicBool,
    messages_published: AtomicU64,
    publish_failures: AtomicU64,
}

impl<T: Transport> std::fmt::Debug for NotificationPublisher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationPublisher")
            .field("subject_prefix", &self.subject_prefix)
            .field("closed", &self.closed)
            .field("messages_published", &self.messages_published)
            .field("publish_failures", &self.publish_failures)
            .finish_non_exhaustive()
    }
}

impl NotificationPublisher<NatsTransport> {
    /// Connect with the default [`ConnectConfig`]
    pub async fn connect(url: &str, subject_prefix: &str) -> Result<Self> {
        Self::connect_with_config(url, subject_prefix, &ConnectConfig::default(), default_reporter())
            .await
    }

    /// Connect with explicit settings and error reporter
    pub async fn connect_with_config(
        url: &str,
        subject_prefix: &str,
        config: &ConnectConfig,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Result<Self> {
        info!(url, subject_prefix, "Connecting notification publisher");
        match NatsTransport::connect(url, config).await {
            Ok(transport) => Ok(Self::with_reporter(transport, subject_prefix, reporter)),
            Err(e) => {
                reporter.report(&e);
                Err(e)
            }
        }
    }

    /// Connect once with caller-built `async_nats` options
    pub async fn connect_with_options(
        url: &str,
        subject_prefix: &str,
        options: ConnectOptions,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Result<Self> {
        match NatsTransport::connect_with_options(url, options).await {
            Ok(transport) => Ok(Self::with_reporter(transport, subject_prefix, reporter)),
            Err(e) => {
                reporter.report(&e);
                Err(e)
            }
        }
    }
}

impl<T: Transport> NotificationPublisher<T> {
    /// Build over an already connected transport
    pub fn with_transport(transport: T, subject_prefix: &str) -> Self {
        Self::with_reporter(transport, subject_prefix, default_reporter())
    }

    pub fn with_reporter(
        transport: T,
        subject_prefix: &str,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            transport,
            subject_prefix: subject_prefix.to_string(),
            reporter,
            closed: AtomicBool::new(false),
            messages_published: AtomicU64::new(0),
            publish_failures: AtomicU64::new(0),
        }
    }

    pub fn subject_prefix(&self) -> &str {
        &self.subject_prefix
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Total notifications accepted by the bus client
    pub fn messages_published(&self) -> u64 {
        self.messages_published.load(Ordering::Relaxed)
    }

    /// Total publish calls that returned an error
    pub fn publish_failures(&self) -> u64 {
        self.publish_failures.load(Ordering::Relaxed)
    }

    pub fn is_connected(&self) -> bool {
        self.connection_status().is_connected()
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        if self.closed.load(Ordering::SeqCst) {
            return ConnectionStatus::Closed;
        }
        self.transport.status()
    }

    /// Publish a new notification built from the given fields
    pub async fn publish_notification(
        &self,
        client_id: &str,
        message: &str,
        kind: NotificationType,
        source: &str,
    ) -> Result<()> {
        let validated = validation::validate_client_id(client_id)
            .and_then(|_| validation::validate_message(message))
            .and_then(|_| validation::validate_source(source));
        if let Err(e) = validated {
            return Err(self.fail(e));
        }

        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            created_at: Some(utc_now()),
            ..Notification::new(client_id, message, kind, source)
        };

        self.send(&notification).await
    }

    /// Publish a caller-built notification
    ///
    /// `client_id`, `id` and `created_at` are filled on the record only when
    /// unset; values already present are published unchanged.
    pub async fn publish_custom_notification(
        &self,
        client_id: &str,
        notification: Option<&mut Notification>,
    ) -> Result<()> {
        if let Err(e) = validation::validate_client_id(client_id) {
            return Err(self.fail(e));
        }
        let Some(notification) = notification else {
            return Err(self.fail(NotificationError::MissingNotification));
        };

        // Validate as if the argument were already filled in; the record is
        // only written once every check passes
        let effective_client_id = if notification.client_id.is_empty() {
            client_id
        } else {
            notification.client_id.as_str()
        };
        let validated = validation::validate_client_id(effective_client_id)
            .and_then(|_| validation::validate_message(&notification.message))
            .and_then(|_| validation::validate_source(&notification.source));
        if let Err(e) = validated {
            return Err(self.fail(e));
        }

        if notification.client_id.is_empty() {
            notification.client_id = client_id.to_string();
        }
        if notification.id.is_empty() {
            notification.id = Uuid::new_v4().to_string();
        }
        if notification.created_at.as_ref().map_or(true, is_zero_time) {
            notification.created_at = Some(utc_now());
        }

        self.send(notification).await
    }

    /// Release the connection. Always succeeds; repeated calls are no-ops.
    pub async fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.transport.close().await;
        }
        Ok(())
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(self.fail(NotificationError::Closed));
        }

        let payload = encode(notification).map_err(|e| self.fail(e))?;

        let subject = subject::build_subject(&self.subject_prefix, &notification.client_id);
        if !subject::validate_subject(&subject) {
            return Err(self.fail(NotificationError::InvalidSubject { subject }));
        }

        debug!(
            subject,
            notification_id = %notification.id,
            kind = %notification.kind,
            "Publishing notification"
        );

        match self.transport.publish(subject.clone(), payload.into()).await {
            Ok(()) => {
                self.messages_published.fetch_add(1, Ordering::Relaxed);
                record_published(&self.subject_prefix);
                debug!(subject, notification_id = %notification.id, "Notification published");
                Ok(())
            }
            Err(source) => Err(self.fail(NotificationError::PublishFailed { subject, source })),
        }
    }

    /// Count and report an error on its way back to the caller
    fn fail(&self, err: NotificationError) -> NotificationError {
        self.publish_failures.fetch_add(1, Ordering::Relaxed);
        record_failure(&err);
        self.reporter.report(&err);
        err
    }
}

#[async_trait]
impl<T: Transport> NotificationPublisherPort for NotificationPublisher<T> {
    async fn publish_notification(
        &self,
        client_id: &str,
        message: &str,
        kind: NotificationType,
        source: &str,
    ) -> Result<()> {
        NotificationPublisher::publish_notification(self, client_id, message, kind, source).await
    }

    async fn publish_custom_notification(
        &self,
        client_id: &str,
        notification: Option<&mut Notification>,
    ) -> Result<()> {
        NotificationPublisher::publish_custom_notification(self, client_id, notification).await
    }

    async fn close(&self) -> Result<()> {
        NotificationPublisher::close(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::NoopReporter;
    use bytes::Bytes;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryTransport {
        sent: Mutex<Vec<(String, Bytes)>>,
        closes: AtomicU64,
    }

    #[async_trait]
    impl Transport for MemoryTransport {
        async fn publish(&self, subject: String, payload: Bytes) -> Result<(), crate::error::BoxError> {
            self.sent.lock().unwrap().push((subject, payload));
            Ok(())
        }

        fn status(&self) -> ConnectionStatus {
            ConnectionStatus::Connected
        }

        async fn close(&self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn publisher() -> NotificationPublisher<MemoryTransport> {
        NotificationPublisher::with_reporter(
            MemoryTransport::default(),
            "notifications",
            Arc::new(NoopReporter),
        )
    }

    #[tokio::test]
    async fn test_publishes_on_client_subject() {
        let publisher = publisher();
        publisher
            .publish_notification("client-123", "hi", NotificationType::Info, "system")
            .await
            .unwrap();

        let sent = publisher.transport().sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "notifications.client-123");
        assert_eq!(publisher.messages_published(), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_transport() {
        let publisher = publisher();
        let err = publisher
            .publish_notification("", "hi", NotificationType::Info, "system")
            .await
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(publisher.transport().sent.lock().unwrap().is_empty());
        assert_eq!(publisher.publish_failures(), 1);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let publisher = publisher();
        assert!(publisher.is_connected());
        publisher.close().await.unwrap();
        publisher.close().await.unwrap();
        assert_eq!(publisher.transport().closes.load(Ordering::SeqCst), 1);
        assert_eq!(publisher.connection_status(), ConnectionStatus::Closed);
        assert!(!publisher.is_connected());
    }

    #[tokio::test]
    async fn test_failed_custom_publish_leaves_record_untouched() {
        let publisher = publisher();
        let mut record = Notification {
            message: "m".to_string(),
            ..Default::default()
        };

        let err = publisher
            .publish_custom_notification("arg-client", Some(&mut record))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "source cannot be empty");
        assert!(record.client_id.is_empty());
        assert!(record.id.is_empty());
        assert!(record.created_at.is_none());
        assert!(publisher.transport().sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_created_at_is_replaced() {
        let publisher = publisher();
        let mut record = crate::notification::decode(
            br#"{"client_id":"c1","message":"m","source":"s","created_at":"0001-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(record.created_at.as_ref().is_some_and(is_zero_time));

        publisher
            .publish_custom_notification("c1", Some(&mut record))
            .await
            .unwrap();

        let created_at = record.created_at.unwrap();
        assert!(!is_zero_time(&created_at));
        let sent = publisher.transport().sent.lock().unwrap();
        let wire = crate::notification::decode(&sent[0].1).unwrap();
        assert_eq!(wire.created_at, Some(created_at));
        assert!(!String::from_utf8_lossy(&sent[0].1).contains("0001-01-01"));
    }

    #[tokio::test]
    async fn test_publish_after_close_fails_internally() {
        let publisher = publisher();
        publisher.close().await.unwrap();
        let err = publisher
            .publish_notification("client", "hi", NotificationType::Info, "system")
            .await
            .unwrap_err();
        assert!(matches!(err, NotificationError::Closed));
        assert_eq!(err.code(), crate::error::ErrorCode::Internal);
    }
}
