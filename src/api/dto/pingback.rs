//! DTOs for pingback administration.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::PingbackRecord;

#[derive(Debug, Serialize)]
pub struct PingbackItem {
    pub id: Uuid,
    pub domain: String,
    pub source_url: String,
    pub source_title: String,
    pub target_post_id: Uuid,
    pub target_post_title: String,
    pub ping_time_utc: DateTime<Utc>,
    pub source_ip: String,
}

impl From<PingbackRecord> for PingbackItem {
    fn from(r: PingbackRecord) -> Self {
        Self {
            id: r.id,
            domain: r.domain,
            source_url: r.source_url,
            source_title: r.source_title,
            target_post_id: r.target_post_id,
            target_post_title: r.target_post_title,
            ping_time_utc: r.ping_time_utc,
            source_ip: r.source_ip,
        }
    }
}

/// Response of `DELETE /api/pingbacks`.
#[derive(Debug, Serialize)]
pub struct ClearPingbacksResponse {
    pub removed: u64,
}
