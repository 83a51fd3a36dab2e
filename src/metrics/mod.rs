//! Publish metrics
//!
//! Recorded through the `metrics` facade. Nothing is exported unless the
//! application installs a recorder; [`install_prometheus`] does that for the
//! demo binary.

use crate::error::NotificationError;
use metrics::{counter, describe_counter, describe_gauge, gauge, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Once;

pub const PUBLISHED_TOTAL: &str = "notifications_published_total";
pub const PUBLISH_FAILURES_TOTAL: &str = "notification_publish_failures_total";
pub const NATS_CONNECTED: &str = "notification_nats_connected";

static DESCRIBE: Once = Once::new();

/// Register metric descriptions with the installed recorder
pub fn describe() {
    DESCRIBE.call_once(|| {
        describe_counter!(
            PUBLISHED_TOTAL,
            Unit::Count,
            "Notifications accepted by the NATS client"
        );
        describe_counter!(
            PUBLISH_FAILURES_TOTAL,
            Unit::Count,
            "Notification publish calls that returned an error"
        );
        describe_gauge!(
            NATS_CONNECTED,
            Unit::Count,
            "NATS connection status (1=connected, 0=disconnected)"
        );
    });
}

pub fn record_published(subject_prefix: &str) {
    counter!(PUBLISHED_TOTAL, "prefix" => subject_prefix.to_string()).increment(1);
}

pub fn record_failure(err: &NotificationError) {
    counter!(PUBLISH_FAILURES_TOTAL, "error_type" => err.error_type_label()).increment(1);
}

pub fn set_nats_connected(connected: bool) {
    gauge!(NATS_CONNECTED).set(if connected { 1.0 } else { 0.0 });
}

/// Install a process-wide Prometheus recorder
pub fn install_prometheus() -> Result<PrometheusHandle, NotificationError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| NotificationError::Config(format!("failed to install metrics recorder: {e}")))?;
    describe();
    Ok(handle)
}
