//! Category management.

use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::GENERAL_DIVISION;
use crate::domain::entities::{Category, NewCategory, UpdateCategory};
use crate::domain::repositories::CategoryRepository;
use crate::error::AppError;
use crate::infrastructure::cache::DivisionCache;
use crate::utils::tag_normalizer::{validate_name, validate_route_name};

const CATEGORIES_CACHE_KEY: &str = "categories";

/// Trimmed fields of a category, checked before they reach the database.
struct CategoryFields {
    route_name: String,
    display_name: String,
    note: Option<String>,
}

fn check_fields(
    route_name: &str,
    display_name: &str,
    note: Option<&str>,
) -> Result<CategoryFields, AppError> {
    let route_name = route_name.trim();
    if !validate_route_name(route_name) {
        return Err(AppError::bad_request(
            "Invalid route name",
            json!({
                "route_name": route_name,
                "reason": "Use 1-64 lowercase letters, digits or inner hyphens",
            }),
        ));
    }

    let display_name = display_name.trim();
    if !validate_name(display_name) {
        return Err(AppError::bad_request(
            "Invalid display name",
            json!({ "display_name": display_name }),
        ));
    }

    Ok(CategoryFields {
        route_name: route_name.to_string(),
        display_name: display_name.to_string(),
        note: note
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
    })
}

/// CRUD for categories with a cached list in the `general` division.
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
    cache: Arc<DivisionCache>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>, cache: Arc<DivisionCache>) -> Self {
        Self { repository, cache }
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for an invalid route or display name
    /// - [`AppError::Conflict`] if the route name is taken
    pub async fn create_category(&self, input: NewCategory) -> Result<Category, AppError> {
        let fields = check_fields(&input.route_name, &input.display_name, input.note.as_deref())?;

        let category = self
            .repository
            .create(NewCategory {
                route_name: fields.route_name,
                display_name: fields.display_name,
                note: fields.note,
            })
            .await?;

        info!(category_id = %category.id, route_name = %category.route_name, "Category created");
        self.cache.remove(GENERAL_DIVISION).await;
        Ok(category)
    }

    /// Replaces a category's fields.
    ///
    /// # Errors
    ///
    /// As [`Self::create_category`], plus [`AppError::NotFound`].
    pub async fn update_category(
        &self,
        id: Uuid,
        input: UpdateCategory,
    ) -> Result<Category, AppError> {
        let fields = check_fields(&input.route_name, &input.display_name, input.note.as_deref())?;

        let category = self
            .repository
            .update(
                id,
                UpdateCategory {
                    route_name: fields.route_name,
                    display_name: fields.display_name,
                    note: fields.note,
                },
            )
            .await?;

        self.cache.remove(GENERAL_DIVISION).await;
        Ok(category)
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(AppError::not_found(
                "Category not found",
                json!({ "id": id }),
            ));
        }

        self.cache.remove(GENERAL_DIVISION).await;
        Ok(())
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.cache
            .get_or_create(GENERAL_DIVISION, CATEGORIES_CACHE_KEY, || {
                self.repository.list()
            })
            .await
    }

    /// Finds a category by its public route name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no category uses this route name.
    pub async fn get_by_route_name(&self, route_name: &str) -> Result<Category, AppError> {
        let route_name = route_name.trim().to_lowercase();
        self.repository
            .find_by_route_name(&route_name)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Category not found", json!({ "route_name": route_name }))
            })
    }
}
