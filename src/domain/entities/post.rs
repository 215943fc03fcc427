//! Post projections needed by pingback target resolution.

use chrono::NaiveDate;
use uuid::Uuid;

/// Route components of a public post URL (`/post/{yyyy}/{M}/{d}/{slug}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRoute {
    /// Publication date (UTC) encoded in the URL.
    pub date: NaiveDate,
    pub slug: String,
}

/// Minimal view of a published post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRef {
    pub id: Uuid,
    pub title: String,
}
