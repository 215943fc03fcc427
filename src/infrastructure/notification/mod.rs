//! Owner notification delivery.
//!
//! - [`LogNotifier`] - writes a structured log line (default)
//! - [`WebhookNotifier`] - POSTs the event as JSON, enabled by `NOTIFICATION_WEBHOOK_URL`

mod log_notifier;
mod webhook_notifier;

pub use log_notifier::LogNotifier;
pub use webhook_notifier::WebhookNotifier;
