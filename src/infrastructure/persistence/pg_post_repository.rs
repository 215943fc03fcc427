//! PostgreSQL lookup of published posts.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{PostRef, PostRoute};
use crate::domain::repositories::PostRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct PostRefRow {
    id: Uuid,
    title: String,
}

pub struct PgPostRepository {
    pool: Arc<PgPool>,
}

impl PgPostRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn find_published_by_route(&self, route: &PostRoute) -> Result<Option<PostRef>, AppError> {
        let row = sqlx::query_as::<_, PostRefRow>(
            r#"
            SELECT id, title
            FROM posts
            WHERE slug = $1
              AND (pub_date_utc AT TIME ZONE 'UTC')::date = $2
              AND is_published
              AND NOT is_deleted
            LIMIT 1
            "#,
        )
        .bind(&route.slug)
        .bind(route.date)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(|r| PostRef {
            id: r.id,
            title: r.title,
        }))
    }
}
