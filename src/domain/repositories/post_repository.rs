//! Repository trait for resolving published posts.

use crate::domain::entities::{PostRef, PostRoute};
use crate::error::AppError;
use async_trait::async_trait;

/// Read-only access to published posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Finds a published, non-deleted post by publication date and slug.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(PostRef))` if found
    /// - `Ok(None)` if no published post matches
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_published_by_route(&self, route: &PostRoute) -> Result<Option<PostRef>, AppError>;
}
