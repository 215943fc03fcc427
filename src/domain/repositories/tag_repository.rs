//! Repository trait for tags.

use crate::domain::entities::{NewTag, Tag};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for post tags.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Lists all tags ordered by display name.
    async fn list(&self) -> Result<Vec<Tag>, AppError>;

    /// Finds tags whose normalized name is in `normalized_names`.
    async fn find_by_normalized_names(
        &self,
        normalized_names: &[String],
    ) -> Result<Vec<Tag>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, AppError>;

    /// Creates a tag.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the normalized name is taken.
    async fn create(&self, new_tag: NewTag) -> Result<Tag, AppError>;

    /// Renames a tag, replacing both display and normalized names.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the tag does not exist and
    /// [`AppError::Conflict`] if the normalized name is taken.
    async fn update(&self, id: Uuid, new_tag: NewTag) -> Result<Tag, AppError>;

    /// Deletes a tag. Returns `Ok(false)` when no row matched.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
