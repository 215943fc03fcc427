//! Pingback receipt and housekeeping.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::{NewPingback, PingbackRecord, PingbackResponse};
use crate::domain::notification_event::NotificationEvent;
use crate::domain::repositories::{PingbackRepository, PostRepository};
use crate::domain::source_inspector::SourceInspector;
use crate::error::AppError;
use crate::utils::post_route::parse_post_route;
use crate::utils::url_normalizer::{host_of, normalize_url, parse_http_url};
use crate::utils::xmlrpc::parse_pingback_call;

/// Validates and registers inbound pingbacks.
///
/// # Pipeline
///
/// 1. Decode the XML-RPC call
/// 2. Fetch and inspect the source document
/// 3. Resolve the target URL to a published post
/// 4. Reject duplicates of (post, source URL, source IP)
/// 5. Store, then queue an owner notification
///
/// Each rejection maps to exactly one [`PingbackResponse`] variant.
pub struct PingbackService {
    pingbacks: Arc<dyn PingbackRepository>,
    posts: Arc<dyn PostRepository>,
    inspector: Arc<dyn SourceInspector>,
    notifications: mpsc::Sender<NotificationEvent>,
    site_host: Option<String>,
}

impl PingbackService {
    /// Creates the service.
    ///
    /// # Arguments
    ///
    /// - `site_host` - when set, targets on any other host are treated as
    ///   not existing
    pub fn new(
        pingbacks: Arc<dyn PingbackRepository>,
        posts: Arc<dyn PostRepository>,
        inspector: Arc<dyn SourceInspector>,
        notifications: mpsc::Sender<NotificationEvent>,
        site_host: Option<String>,
    ) -> Self {
        Self {
            pingbacks,
            posts,
            inspector,
            notifications,
            site_host,
        }
    }

    /// Processes a raw `pingback.ping` request body.
    ///
    /// Never fails: storage and network problems surface as
    /// [`PingbackResponse::GenericError`].
    pub async fn receive_ping(&self, raw_body: &str, source_ip: &str) -> PingbackResponse {
        let response = self.process(raw_body, source_ip).await;
        metrics::counter!("pingback_requests_total", "result" => response.as_str()).increment(1);
        response
    }

    async fn process(&self, raw_body: &str, source_ip: &str) -> PingbackResponse {
        let call = match parse_pingback_call(raw_body) {
            Ok(call) => call,
            Err(e) => {
                debug!(error = %e, source_ip, "Rejected pingback request");
                return PingbackResponse::InvalidPingRequest;
            }
        };

        // Duplicates are keyed on the normalized source, so host case and
        // fragments do not register the same page twice.
        let source_url = match (
            normalize_url(&call.source_url),
            parse_http_url(&call.target_url),
        ) {
            (Ok(source_url), Ok(_)) => source_url,
            _ => {
                debug!(
                    source_url = %call.source_url,
                    target_url = %call.target_url,
                    "Pingback URLs are not absolute http(s) URLs"
                );
                return PingbackResponse::InvalidPingRequest;
            }
        };

        let request = match self
            .inspector
            .inspect(&call.source_url, &call.target_url)
            .await
        {
            Ok(request) => request,
            Err(e) if e.is_spam_signal() => {
                info!(source_url = %call.source_url, error = %e, "Pingback source looks like spam");
                return PingbackResponse::SpamDetectedFakeNotFound;
            }
            Err(e) => {
                warn!(source_url = %call.source_url, error = %e, "Pingback source could not be inspected");
                return PingbackResponse::GenericError;
            }
        };

        if !request.contains_html {
            info!(source_url = %request.source_url, "Pingback source is not an HTML document");
            return PingbackResponse::SpamDetectedFakeNotFound;
        }

        if !request.source_has_link {
            debug!(
                source_url = %request.source_url,
                target_url = %request.target_url,
                "Pingback source does not link to target"
            );
            return PingbackResponse::Error17SourceNotContainTargetUri;
        }

        let route = match parse_post_route(&request.target_url, self.site_host.as_deref()) {
            Ok(route) => route,
            Err(e) => {
                debug!(target_url = %request.target_url, error = %e, "Pingback target is not a post");
                return PingbackResponse::Error32TargetUriNotExist;
            }
        };

        let post = match self.posts.find_published_by_route(&route).await {
            Ok(Some(post)) => post,
            Ok(None) => {
                debug!(target_url = %request.target_url, "Pingback target post not found");
                return PingbackResponse::Error32TargetUriNotExist;
            }
            Err(e) => {
                warn!(error = %e, "Post lookup failed");
                return PingbackResponse::GenericError;
            }
        };

        match self
            .pingbacks
            .exists(post.id, &source_url, source_ip)
            .await
        {
            Ok(true) => return PingbackResponse::Error48PingbackAlreadyRegistered,
            Ok(false) => {}
            Err(e) => {
                warn!(error = %e, "Pingback duplicate check failed");
                return PingbackResponse::GenericError;
            }
        }

        let new_pingback = NewPingback {
            domain: host_of(&source_url).unwrap_or_default(),
            source_url,
            source_title: request.source_document_title,
            target_post_id: post.id,
            target_post_title: post.title,
            source_ip: source_ip.to_string(),
        };

        let record = match self.pingbacks.create(new_pingback).await {
            Ok(record) => record,
            // Lost a race against an identical ping; the unique index decided.
            Err(AppError::Conflict { .. }) => {
                return PingbackResponse::Error48PingbackAlreadyRegistered;
            }
            Err(e) => {
                warn!(error = %e, "Failed to store pingback");
                return PingbackResponse::GenericError;
            }
        };

        info!(
            pingback_id = %record.id,
            source_url = %record.source_url,
            target_post_id = %record.target_post_id,
            "Pingback registered"
        );
        self.enqueue_notification(record);

        PingbackResponse::Success
    }

    fn enqueue_notification(&self, record: PingbackRecord) {
        match self
            .notifications
            .try_send(NotificationEvent::PingbackReceived(record))
        {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(kind = event.kind(), "Notification queue full, dropping event");
                metrics::counter!("notifications_total", "outcome" => "dropped").increment(1);
            }
            Err(TrySendError::Closed(event)) => {
                warn!(kind = event.kind(), "Notification worker stopped, dropping event");
                metrics::counter!("notifications_total", "outcome" => "dropped").increment(1);
            }
        }
    }

    /// Lists pingbacks, newest first.
    pub async fn list_pingbacks(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<PingbackRecord>, AppError> {
        self.pingbacks.list(page, page_size).await
    }

    pub async fn count_pingbacks(&self) -> Result<i64, AppError> {
        self.pingbacks.count().await
    }

    /// Deletes one pingback.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no pingback has this id.
    pub async fn delete_pingback(&self, id: Uuid) -> Result<(), AppError> {
        if !self.pingbacks.delete(id).await? {
            return Err(AppError::not_found(
                "Pingback not found",
                json!({ "id": id }),
            ));
        }
        info!(pingback_id = %id, "Pingback deleted");
        Ok(())
    }

    /// Deletes every pingback and returns how many were removed.
    pub async fn clear_pingbacks(&self) -> Result<u64, AppError> {
        let removed = self.pingbacks.clear().await?;
        info!(removed, "Pingbacks cleared");
        Ok(removed)
    }
}
