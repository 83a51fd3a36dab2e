//! notify - publish a single notification from the command line
//!
//! Usage: `notify <client_id> <message> [type] [source]`
//!
//! `type` is one of info, warning, error, success, system (default info).
//! Connection settings come from the environment, see `PublisherConfig`.

use anyhow::{bail, Context, Result};
use notification_sdk::{NotificationPublisher, NotificationType, PublisherConfig, TracingReporter};
use std::sync::Arc;
use tracing::info;

fn parse_type(raw: &str) -> Result<NotificationType> {
    Ok(match raw.to_ascii_lowercase().as_str() {
        "info" => NotificationType::Info,
        "warning" => NotificationType::Warning,
        "error" => NotificationType::Error,
        "success" => NotificationType::Success,
        "system" => NotificationType::System,
        other => bail!("unknown notification type '{other}'"),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first to get log level
    let config = PublisherConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("notification_sdk={}", config.log_level).parse()?)
                .add_directive(format!("notify={}", config.log_level).parse()?)
                .add_directive("async_nats=warn".parse()?),
        )
        .json()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (client_id, message) = match (args.first(), args.get(1)) {
        (Some(client_id), Some(message)) => (client_id.as_str(), message.as_str()),
        _ => bail!("usage: notify <client_id> <message> [type] [source]"),
    };
    let kind = args.get(2).map(|raw| parse_type(raw)).transpose()?.unwrap_or_default();
    let source = args.get(3).map(String::as_str).unwrap_or("cli");

    let metrics = notification_sdk::metrics::install_prometheus()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        url = %config.nats_url,
        prefix = %config.subject_prefix,
        "Starting notify"
    );

    let publisher = NotificationPublisher::connect_with_config(
        &config.nats_url,
        &config.subject_prefix,
        &config.connect,
        Arc::new(TracingReporter),
    )
    .await
    .context("Failed to create notification publisher")?;

    info!(status = %publisher.connection_status(), "Publisher ready");

    publisher
        .publish_notification(client_id, message, kind, source)
        .await
        .context("Failed to publish notification")?;

    info!(client_id, %kind, source, "Notification published");

    publisher.close().await?;
    info!(metrics = %metrics.render(), "Publisher metrics");
    Ok(())
}
