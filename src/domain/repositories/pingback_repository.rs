//! Repository trait for pingback storage.

use crate::domain::entities::{NewPingback, PingbackRecord};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for registered pingbacks.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgPingbackRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PingbackRepository: Send + Sync {
    /// Returns `true` if a pingback for this (post, source URL, source IP)
    /// triple is already stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn exists(
        &self,
        target_post_id: Uuid,
        source_url: &str,
        source_ip: &str,
    ) -> Result<bool, AppError>;

    /// Stores a new pingback.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the (post, source URL, source IP)
    /// unique index rejects the row.
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_pingback: NewPingback) -> Result<PingbackRecord, AppError>;

    /// Lists pingbacks, newest first.
    ///
    /// # Arguments
    ///
    /// - `page` - Page number (1-indexed)
    /// - `page_size` - Number of items per page
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<PingbackRecord>, AppError>;

    /// Counts stored pingbacks.
    async fn count(&self) -> Result<i64, AppError>;

    /// Deletes a single pingback. Returns `Ok(false)` when no row matched.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Deletes every pingback and returns the number of removed rows.
    async fn clear(&self) -> Result<u64, AppError>;
}
