//! Background consumer of [`NotificationEvent`]s.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::notification_event::{NotificationEvent, Notifier};

/// Drains the notification queue until every sender is dropped.
///
/// Delivery failures are logged and counted; they never stop the worker.
pub async fn run_notification_worker(
    mut rx: mpsc::Receiver<NotificationEvent>,
    notifier: Arc<dyn Notifier>,
) {
    info!("Notification worker started");

    while let Some(event) = rx.recv().await {
        match notifier.notify(&event).await {
            Ok(()) => {
                debug!(kind = event.kind(), "Notification delivered");
                metrics::counter!("notifications_total", "outcome" => "delivered").increment(1);
            }
            Err(e) => {
                warn!(kind = event.kind(), error = %e, "Notification delivery failed");
                metrics::counter!("notifications_total", "outcome" => "failed").increment(1);
            }
        }
    }

    info!("Notification worker stopped");
}
