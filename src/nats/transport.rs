//! Bus transport seam
//!
//! The publisher only needs "publish bytes on a subject", a connection state
//! and a way to let go of the connection. [`NatsTransport`] provides those on
//! top of `async_nats`.

use super::connection::{connect_with_options, connect_with_retry, ConnectConfig, ConnectionStatus};
use crate::error::{BoxError, Result};
use async_nats::jetstream::{self, Context as JsContext};
use async_nats::{Client, ConnectOptions};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info};

/// Message bus operations used by the publisher
#[async_trait]
pub trait Transport: Send + Sync {
    /// Hand a payload to the bus client.
    ///
    /// Returns once the client accepted the message; delivery is up to the
    /// client and server.
    async fn publish(&self, subject: String, payload: Bytes) -> Result<(), BoxError>;

    /// Current connection state
    fn status(&self) -> ConnectionStatus;

    /// Release the connection. Calling it again is a no-op.
    async fn close(&self);
}

struct NatsConnection {
    client: Client,
    jetstream: JsContext,
}

/// `async_nats` backed transport
pub struct NatsTransport {
    inner: RwLock<Option<NatsConnection>>,
}

impl NatsTransport {
    /// Connect with retries and acquire the JetStream context
    pub async fn connect(url: &str, config: &ConnectConfig) -> Result<Self> {
        let client = connect_with_retry(url, config).await?;
        Ok(Self::from_client(client))
    }

    /// Connect once with caller-built options
    pub async fn connect_with_options(url: &str, options: ConnectOptions) -> Result<Self> {
        let client = connect_with_options(url, options).await?;
        Ok(Self::from_client(client))
    }

    /// Wrap an existing client
    pub fn from_client(client: Client) -> Self {
        let jetstream = jetstream::new(client.clone());
        debug!("JetStream context acquired");
        Self {
            inner: RwLock::new(Some(NatsConnection { client, jetstream })),
        }
    }

    /// Underlying client, `None` once closed
    pub fn client(&self) -> Option<Client> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|conn| conn.client.clone())
    }

    /// JetStream context, `None` once closed
    pub fn jetstream(&self) -> Option<JsContext> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|conn| conn.jetstream.clone())
    }
}

#[async_trait]
impl Transport for NatsTransport {
    async fn publish(&self, subject: String, payload: Bytes) -> Result<(), BoxError> {
        let client = self.client().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotConnected, "connection closed")
        })?;
        client.publish(subject, payload).await?;
        Ok(())
    }

    fn status(&self) -> ConnectionStatus {
        match self.client() {
            Some(client) => client.connection_state().into(),
            None => ConnectionStatus::Closed,
        }
    }

    async fn close(&self) {
        let conn = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(conn) = conn {
            info!("Closing NATS connection");
            if let Err(e) = conn.client.flush().await {
                debug!(error = %e, "Flush before close failed");
            }
            // async-nats disconnects once the last client handle is dropped
        }
    }
}
