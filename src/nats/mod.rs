//! NATS integration
//!
//! Connection helpers, the transport seam and the notification publisher.

mod connection;
mod publisher;
mod transport;

pub use connection::{connect_with_options, connect_with_retry, ConnectConfig, ConnectionStatus};
pub use publisher::NotificationPublisher;
pub use transport::{NatsTransport, Transport};
