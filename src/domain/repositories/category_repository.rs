//! Repository trait for categories.

use crate::domain::entities::{Category, NewCategory, UpdateCategory};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for post categories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Lists all categories ordered by display name.
    async fn list(&self) -> Result<Vec<Category>, AppError>;

    async fn find_by_route_name(&self, route_name: &str) -> Result<Option<Category>, AppError>;

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the route name is taken.
    async fn create(&self, new_category: NewCategory) -> Result<Category, AppError>;

    /// Replaces a category's editable fields.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the category does not exist and
    /// [`AppError::Conflict`] if the route name is taken.
    async fn update(&self, id: Uuid, update: UpdateCategory) -> Result<Category, AppError>;

    /// Deletes a category. Returns `Ok(false)` when no row matched.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
