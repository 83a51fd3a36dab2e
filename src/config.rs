//! Publisher configuration
//!
//! Loaded from environment variables (and `.env` when present).

use crate::error::NotificationError;
use crate::nats::ConnectConfig;
use crate::subject::DEFAULT_PREFIX;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_NATS_URL: &str = "nats://127.0.0.1:4222";

/// Publisher configuration
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// NATS server URL(s) - comma-separated for multiple servers
    pub nats_url: String,

    /// Subject prefix; notifications go to `{prefix}.{client_id}`
    pub subject_prefix: String,

    /// Connect and reconnect policy
    pub connect: ConnectConfig,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            nats_url: DEFAULT_NATS_URL.to_string(),
            subject_prefix: DEFAULT_PREFIX.to_string(),
            connect: ConnectConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

fn parse_var<T>(name: &str, value: Option<String>) -> Result<Option<T>, NotificationError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| NotificationError::Config(format!("{name} must be a valid number: {e}")))
        })
        .transpose()
}

impl PublisherConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, NotificationError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NotificationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let mut connect = defaults.connect;

        let nats_url = lookup("NATS_URL").unwrap_or(defaults.nats_url);

        let subject_prefix = lookup("NOTIFICATION_SUBJECT_PREFIX").unwrap_or(defaults.subject_prefix);
        if subject_prefix.is_empty() || subject_prefix.contains(' ') {
            return Err(NotificationError::Config(
                "NOTIFICATION_SUBJECT_PREFIX must be non-empty and contain no spaces".to_string(),
            ));
        }

        if let Some(attempts) = parse_var::<u32>("NATS_CONNECT_RETRIES", lookup("NATS_CONNECT_RETRIES"))? {
            connect.connect_attempts = attempts;
        }
        if let Some(secs) =
            parse_var::<u64>("NATS_CONNECT_TIMEOUT_SECS", lookup("NATS_CONNECT_TIMEOUT_SECS"))?
        {
            connect.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_var::<u64>("NATS_RECONNECT_WAIT_MS", lookup("NATS_RECONNECT_WAIT_MS"))? {
            connect.reconnect_wait = Duration::from_millis(ms);
        }
        // Negative values mean unlimited
        if let Some(max) = parse_var::<i64>("NATS_MAX_RECONNECTS", lookup("NATS_MAX_RECONNECTS"))? {
            connect.max_reconnects = usize::try_from(max).ok();
        }
        connect.name = lookup("NATS_CLIENT_NAME");

        let log_level = lookup("LOG_LEVEL").unwrap_or(defaults.log_level);

        Ok(Self {
            nats_url,
            subject_prefix,
            connect,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<PublisherConfig, NotificationError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PublisherConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.nats_url, DEFAULT_NATS_URL);
        assert_eq!(config.subject_prefix, "notifications");
        assert_eq!(config.connect, ConnectConfig::default());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = load(&[
            ("NATS_URL", "nats://nats:4222"),
            ("NOTIFICATION_SUBJECT_PREFIX", "app.notifications"),
            ("NATS_CONNECT_RETRIES", "5"),
            ("NATS_CONNECT_TIMEOUT_SECS", "3"),
            ("NATS_RECONNECT_WAIT_MS", "250"),
            ("NATS_MAX_RECONNECTS", "10"),
            ("NATS_CLIENT_NAME", "billing"),
        ])
        .unwrap();

        assert_eq!(config.nats_url, "nats://nats:4222");
        assert_eq!(config.subject_prefix, "app.notifications");
        assert_eq!(config.connect.connect_attempts, 5);
        assert_eq!(config.connect.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.connect.reconnect_wait, Duration::from_millis(250));
        assert_eq!(config.connect.max_reconnects, Some(10));
        assert_eq!(config.connect.name.as_deref(), Some("billing"));
    }

    #[test]
    fn test_negative_max_reconnects_is_unlimited() {
        let config = load(&[("NATS_MAX_RECONNECTS", "-1")]).unwrap();
        assert_eq!(config.connect.max_reconnects, None);
    }

    #[test]
    fn test_bad_number_is_config_error() {
        let err = load(&[("NATS_CONNECT_RETRIES", "three")]).unwrap_err();
        assert!(matches!(err, NotificationError::Config(_)));
        assert!(err.to_string().contains("NATS_CONNECT_RETRIES"));
    }

    #[test]
    fn test_prefix_with_space_is_rejected() {
        assert!(load(&[("NOTIFICATION_SUBJECT_PREFIX", "my notifications")]).is_err());
    }
}
