//! PostgreSQL implementation of the category repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Category, NewCategory, UpdateCategory};
use crate::domain::repositories::CategoryRepository;
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on;

const CATEGORY_UNIQUE_CONSTRAINT: &str = "categories_route_name_key";

#[derive(FromRow)]
struct CategoryRow {
    id: Uuid,
    route_name: String,
    display_name: String,
    note: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(r: CategoryRow) -> Self {
        Self {
            id: r.id,
            route_name: r.route_name,
            display_name: r.display_name,
            note: r.note,
        }
    }
}

fn map_category_error(e: sqlx::Error, route_name: &str) -> AppError {
    if is_unique_violation_on(&e, CATEGORY_UNIQUE_CONSTRAINT) {
        return AppError::conflict(
            "Category route name already in use",
            json!({ "route_name": route_name }),
        );
    }
    AppError::from(e)
}

pub struct PgCategoryRepository {
    pool: Arc<PgPool>,
}

impl PgCategoryRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, AppError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, route_name, display_name, note FROM categories ORDER BY display_name",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_by_route_name(&self, route_name: &str) -> Result<Option<Category>, AppError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, route_name, display_name, note FROM categories WHERE route_name = $1",
        )
        .bind(route_name)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Category::from))
    }

    async fn create(&self, new_category: NewCategory) -> Result<Category, AppError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (id, route_name, display_name, note)
            VALUES ($1, $2, $3, $4)
            RETURNING id, route_name, display_name, note
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_category.route_name)
        .bind(&new_category.display_name)
        .bind(&new_category.note)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| map_category_error(e, &new_category.route_name))?;

        Ok(row.into())
    }

    async fn update(&self, id: Uuid, update: UpdateCategory) -> Result<Category, AppError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            UPDATE categories
            SET route_name = $2, display_name = $3, note = $4
            WHERE id = $1
            RETURNING id, route_name, display_name, note
            "#,
        )
        .bind(id)
        .bind(&update.route_name)
        .bind(&update.display_name)
        .bind(&update.note)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| map_category_error(e, &update.route_name))?;

        row.map(Category::from)
            .ok_or_else(|| AppError::not_found("Category not found", json!({ "id": id })))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
