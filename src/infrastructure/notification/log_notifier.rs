use async_trait::async_trait;
use tracing::info;

use crate::domain::notification_event::{NotificationEvent, Notifier};

/// Reports events through `tracing` only.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, event: &NotificationEvent) -> anyhow::Result<()> {
        match event {
            NotificationEvent::PingbackReceived(record) => info!(
                pingback_id = %record.id,
                source_url = %record.source_url,
                source_title = %record.source_title,
                target_post_id = %record.target_post_id,
                target_post_title = %record.target_post_title,
                "New pingback received"
            ),
        }
        Ok(())
    }
}
