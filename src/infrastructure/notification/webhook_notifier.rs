//! JSON webhook delivery with bounded retries.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::entities::PingbackRecord;
use crate::domain::notification_event::{NotificationEvent, Notifier};

const MAX_ATTEMPTS: usize = 3;

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum WebhookPayload<'a> {
    PingbackReceived { pingback: &'a PingbackRecord },
}

impl<'a> From<&'a NotificationEvent> for WebhookPayload<'a> {
    fn from(event: &'a NotificationEvent) -> Self {
        match event {
            NotificationEvent::PingbackReceived(record) => {
                Self::PingbackReceived { pingback: record }
            }
        }
    }
}

/// Posts each event to a fixed URL.
///
/// Non-2xx answers and transport errors are retried with exponential backoff.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, event: &NotificationEvent) -> anyhow::Result<()> {
        let payload = WebhookPayload::from(event);
        let strategy = ExponentialBackoff::from_millis(100)
            .map(jitter)
            .take(MAX_ATTEMPTS - 1);

        let client = &self.client;
        let url = self.url.as_str();
        let payload = &payload;

        Retry::spawn(strategy, move || async move {
            client
                .post(url)
                .json(payload)
                .send()
                .await?
                .error_for_status()
                .map(|_| ())
        })
        .await
        .with_context(|| format!("webhook delivery to {} failed", self.url))
    }
}
