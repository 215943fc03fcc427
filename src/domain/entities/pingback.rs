//! Pingback entities: the inspected request, the persisted record and the
//! closed set of outcomes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// The result of inspecting a pingback source document.
///
/// Built once per inbound call, after the XML-RPC payload has been decoded and
/// the source URL fetched. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingRequest {
    pub source_url: String,
    pub target_url: String,
    pub source_document_title: String,
    /// The source contains an `<a href>` pointing at the target URL.
    pub source_has_link: bool,
    /// The source body is actual HTML markup rather than text or binary
    /// served under an HTML content type.
    pub contains_html: bool,
}

/// A registered pingback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PingbackRecord {
    pub id: Uuid,
    /// Host of the source URL.
    pub domain: String,
    pub source_url: String,
    pub source_title: String,
    pub target_post_id: Uuid,
    pub target_post_title: String,
    pub ping_time_utc: DateTime<Utc>,
    pub source_ip: String,
}

/// Input data for registering a pingback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPingback {
    pub domain: String,
    pub source_url: String,
    pub source_title: String,
    pub target_post_id: Uuid,
    pub target_post_title: String,
    pub source_ip: String,
}

impl NewPingback {
    /// Materializes the record that will be stored for this input.
    pub fn into_record(self, id: Uuid, ping_time_utc: DateTime<Utc>) -> PingbackRecord {
        PingbackRecord {
            id,
            domain: self.domain,
            source_url: self.source_url,
            source_title: self.source_title,
            target_post_id: self.target_post_id,
            target_post_title: self.target_post_title,
            ping_time_utc,
            source_ip: self.source_ip,
        }
    }
}

/// Outcome of processing a `pingback.ping` call.
///
/// Every validation failure maps to exactly one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingbackResponse {
    Success,
    /// Empty body, malformed XML-RPC, wrong method or missing parameters.
    InvalidPingRequest,
    /// Fault 17: the source document does not link to the target.
    Error17SourceNotContainTargetUri,
    /// Fault 32: the target does not resolve to a published post.
    Error32TargetUriNotExist,
    /// Fault 48: the same source already pinged this post from this IP.
    Error48PingbackAlreadyRegistered,
    /// The source is not an HTML page or looks like spam; answered with a 404.
    SpamDetectedFakeNotFound,
    GenericError,
}

impl PingbackResponse {
    /// Label used for metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::InvalidPingRequest => "invalid_request",
            Self::Error17SourceNotContainTargetUri => "source_missing_link",
            Self::Error32TargetUriNotExist => "target_not_found",
            Self::Error48PingbackAlreadyRegistered => "already_registered",
            Self::SpamDetectedFakeNotFound => "spam",
            Self::GenericError => "error",
        }
    }

    /// XML-RPC fault code for the variants answered with a fault body.
    pub fn fault_code(&self) -> Option<i32> {
        match self {
            Self::Error17SourceNotContainTargetUri => Some(17),
            Self::Error32TargetUriNotExist => Some(32),
            Self::Error48PingbackAlreadyRegistered => Some(48),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}
