//! Events handed to the background notification worker.

use crate::domain::entities::PingbackRecord;
use async_trait::async_trait;

/// Something the blog owner should hear about.
///
/// Sent from request handlers through a bounded channel so that delivery
/// never delays the HTTP response.
#[derive(Debug, Clone)]
pub enum NotificationEvent {
    PingbackReceived(PingbackRecord),
}

impl NotificationEvent {
    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PingbackReceived(_) => "pingback_received",
        }
    }
}

/// Delivery channel for owner notifications.
///
/// # Implementations
///
/// - [`crate::infrastructure::notification::LogNotifier`] - writes a structured log line
/// - [`crate::infrastructure::notification::WebhookNotifier`] - POSTs JSON to a webhook
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: &NotificationEvent) -> anyhow::Result<()>;
}
