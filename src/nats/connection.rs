//! NATS connection helpers
//!
//! Reconnect policy is carried by [`ConnectConfig`] and handed to
//! `async_nats`; this module only adds a bounded retry around the initial
//! connect.

use crate::error::{NotificationError, Result};
use crate::metrics::set_nats_connected;
use async_nats::connection::State;
use async_nats::{Client, ConnectOptions, Event};
use rand::Rng;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Connection and reconnect settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectConfig {
    /// Client name announced to the server
    pub name: Option<String>,
    /// Initial connect attempts before giving up
    pub connect_attempts: u32,
    /// Sleep between attempts grows linearly: `retry_backoff * attempt`
    pub retry_backoff: Duration,
    /// Timeout for each initial connect attempt
    pub connect_timeout: Duration,
    /// `None` reconnects forever
    pub max_reconnects: Option<usize>,
    /// Base delay between reconnect attempts
    pub reconnect_wait: Duration,
    /// Upper bound of the random delay added to `reconnect_wait`
    pub reconnect_jitter: Duration,
    /// Outgoing commands buffered while the connection is down
    pub reconnect_buffer: usize,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            name: None,
            connect_attempts: 3,
            retry_backoff: Duration::from_secs(1),
            connect_timeout: Duration::from_secs(10),
            max_reconnects: None,
            reconnect_wait: Duration::from_secs(2),
            reconnect_jitter: Duration::from_millis(500),
            reconnect_buffer: 8192,
        }
    }
}

/// Whole milliseconds, capped at `u64::MAX`
fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl ConnectConfig {
    /// Delay before reconnect attempt `attempt`
    pub fn reconnect_delay(&self, _attempt: usize) -> Duration {
        let jitter_ms = saturating_millis(self.reconnect_jitter);
        let jitter = if jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=jitter_ms)
        };
        self.reconnect_wait + Duration::from_millis(jitter)
    }

    /// Sleep after failed attempt `attempt` (1-based)
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        self.retry_backoff * attempt
    }

    /// Build `async_nats` options for one connect attempt
    pub fn to_connect_options(&self) -> ConnectOptions {
        let delay_config = self.clone();
        let mut options = ConnectOptions::new()
            .connection_timeout(self.connect_timeout)
            .max_reconnects(self.max_reconnects)
            .client_capacity(self.reconnect_buffer)
            .reconnect_delay_callback(move |attempt| delay_config.reconnect_delay(attempt))
            .event_callback(|event| async move { log_event(event) });

        if let Some(ref name) = self.name {
            options = options.name(name);
        }
        options
    }
}

fn log_event(event: Event) {
    match event {
        Event::Connected => {
            set_nats_connected(true);
            info!("NATS connection established");
        }
        Event::Disconnected => {
            set_nats_connected(false);
            warn!("NATS connection lost, reconnecting");
        }
        other => debug!(event = %other, "NATS client event"),
    }
}

/// Connect with a bounded number of attempts
pub async fn connect_with_retry(url: &str, config: &ConnectConfig) -> Result<Client> {
    let attempts = config.connect_attempts.max(1);
    let mut attempt = 1;

    loop {
        match config.to_connect_options().connect(url).await {
            Ok(client) => {
                info!(url, attempt, "Connected to NATS");
                return Ok(client);
            }
            Err(e) if attempt < attempts => {
                let delay = config.retry_delay(attempt);
                warn!(
                    url,
                    attempt,
                    max_attempts = attempts,
                    retry_in_ms = saturating_millis(delay),
                    error = %e,
                    "NATS connect failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(NotificationError::ConnectFailed {
                    attempts,
                    source: Box::new(e),
                });
            }
        }
    }
}

/// Single connect attempt with caller-built options
pub async fn connect_with_options(url: &str, options: ConnectOptions) -> Result<Client> {
    let client = options
        .connect(url)
        .await
        .map_err(|e| NotificationError::ConnectFailed {
            attempts: 1,
            source: Box::new(e),
        })?;
    info!(url, "Connected to NATS");
    Ok(client)
}

/// Connection state as seen by the publisher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected,
    Closed,
}

impl ConnectionStatus {
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }
}

impl From<State> for ConnectionStatus {
    fn from(state: State) -> Self {
        match state {
            State::Pending => Self::Connecting,
            State::Connected => Self::Connected,
            State::Disconnected => Self::Disconnected,
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "CONNECTING",
            Self::Connected => "CONNECTED",
            Self::Disconnected => "DISCONNECTED",
            Self::Closed => "CLOSED",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reconnect_policy() {
        let config = ConnectConfig::default();
        assert_eq!(config.connect_attempts, 3);
        assert_eq!(config.max_reconnects, None);
        assert_eq!(config.reconnect_wait, Duration::from_secs(2));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_retry_backoff_is_linear() {
        let config = ConnectConfig::default();
        assert_eq!(config.retry_delay(1), Duration::from_secs(1));
        assert_eq!(config.retry_delay(2), Duration::from_secs(2));
    }

    #[test]
    fn test_reconnect_delay_stays_within_jitter() {
        let config = ConnectConfig::default();
        for attempt in 0..50 {
            let delay = config.reconnect_delay(attempt);
            assert!(delay >= Duration::from_secs(2));
            assert!(delay <= Duration::from_millis(2500));
        }

        let no_jitter = ConnectConfig {
            reconnect_jitter: Duration::ZERO,
            ..ConnectConfig::default()
        };
        assert_eq!(no_jitter.reconnect_delay(3), Duration::from_secs(2));
    }

    #[test]
    fn test_saturating_millis_caps_large_durations() {
        assert_eq!(saturating_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(saturating_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_state_mapping() {
        assert_eq!(ConnectionStatus::from(State::Pending), ConnectionStatus::Connecting);
        assert_eq!(ConnectionStatus::from(State::Connected), ConnectionStatus::Connected);
        assert_eq!(
            ConnectionStatus::from(State::Disconnected),
            ConnectionStatus::Disconnected
        );
        assert!(ConnectionStatus::Connected.is_connected());
        assert!(!ConnectionStatus::Closed.is_connected());
        assert_eq!(ConnectionStatus::Closed.to_string(), "CLOSED");
    }

    #[tokio::test]
    async fn test_unreachable_server_fails_after_all_attempts() {
        let config = ConnectConfig {
            connect_attempts: 2,
            retry_backoff: Duration::from_millis(10),
            connect_timeout: Duration::from_millis(200),
            ..ConnectConfig::default()
        };

        let err = connect_with_retry("nats://127.0.0.1:1", &config)
            .await
            .unwrap_err();
        assert!(matches!(err, NotificationError::ConnectFailed { attempts: 2, .. }));
        assert!(err.to_string().contains("failed to connect to NATS"));
    }
}
