//! PostgreSQL implementation of the tag repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{NewTag, Tag};
use crate::domain::repositories::TagRepository;
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on;

const TAG_UNIQUE_CONSTRAINT: &str = "tags_normalized_name_key";

#[derive(FromRow)]
struct TagRow {
    id: Uuid,
    display_name: String,
    normalized_name: String,
}

impl From<TagRow> for Tag {
    fn from(r: TagRow) -> Self {
        Self {
            id: r.id,
            display_name: r.display_name,
            normalized_name: r.normalized_name,
        }
    }
}

fn map_tag_error(e: sqlx::Error, normalized_name: &str) -> AppError {
    if is_unique_violation_on(&e, TAG_UNIQUE_CONSTRAINT) {
        return AppError::conflict(
            "Tag already exists",
            json!({ "normalized_name": normalized_name }),
        );
    }
    AppError::from(e)
}

pub struct PgTagRepository {
    pool: Arc<PgPool>,
}

impl PgTagRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, AppError> {
        let rows = sqlx::query_as::<_, TagRow>(
            "SELECT id, display_name, normalized_name FROM tags ORDER BY display_name",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn find_by_normalized_names(
        &self,
        normalized_names: &[String],
    ) -> Result<Vec<Tag>, AppError> {
        if normalized_names.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT id, display_name, normalized_name
            FROM tags
            WHERE normalized_name = ANY($1)
            "#,
        )
        .bind(normalized_names)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, AppError> {
        let row = sqlx::query_as::<_, TagRow>(
            "SELECT id, display_name, normalized_name FROM tags WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Tag::from))
    }

    async fn create(&self, new_tag: NewTag) -> Result<Tag, AppError> {
        let row = sqlx::query_as::<_, TagRow>(
            r#"
            INSERT INTO tags (id, display_name, normalized_name)
            VALUES ($1, $2, $3)
            RETURNING id, display_name, normalized_name
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_tag.display_name)
        .bind(&new_tag.normalized_name)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| map_tag_error(e, &new_tag.normalized_name))?;

        Ok(row.into())
    }

    async fn update(&self, id: Uuid, new_tag: NewTag) -> Result<Tag, AppError> {
        let row = sqlx::query_as::<_, TagRow>(
            r#"
            UPDATE tags
            SET display_name = $2, normalized_name = $3
            WHERE id = $1
            RETURNING id, display_name, normalized_name
            "#,
        )
        .bind(id)
        .bind(&new_tag.display_name)
        .bind(&new_tag.normalized_name)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| map_tag_error(e, &new_tag.normalized_name))?;

        row.map(Tag::from)
            .ok_or_else(|| AppError::not_found("Tag not found", json!({ "id": id })))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
