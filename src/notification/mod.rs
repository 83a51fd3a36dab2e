//! Notification data model
//!
//! One canonical [`Notification`] record plus the organization-level email
//! preferences aggregate. JSON helpers live in [`codec`].

pub mod codec;
mod model;
mod preferences;

pub use codec::{decode, encode, format_timestamp, is_zero_time, utc_now};
pub use model::{Notification, NotificationEvent, NotificationType};
pub use preferences::{OrganizationNotificationPreferences, WorkflowEmailPreference};
