//! PostgreSQL implementation of the pingback repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{NewPingback, PingbackRecord};
use crate::domain::repositories::PingbackRepository;
use crate::error::AppError;
use crate::utils::db_error::{PINGBACK_UNIQUE_CONSTRAINT, is_unique_violation_on};

#[derive(FromRow)]
struct PingbackRow {
    id: Uuid,
    domain: String,
    source_url: String,
    source_title: String,
    target_post_id: Uuid,
    target_post_title: String,
    ping_time_utc: DateTime<Utc>,
    source_ip: String,
}

impl From<PingbackRow> for PingbackRecord {
    fn from(r: PingbackRow) -> Self {
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

/// PostgreSQL repository for registered pingbacks.
pub struct PgPingbackRepository {
    pool: Arc<PgPool>,
}

impl PgPingbackRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PingbackRepository for PgPingbackRepository {
    async fn exists(
        &self,
        target_post_id: Uuid,
        source_url: &str,
        source_ip: &str,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM pingbacks
                WHERE target_post_id = $1 AND source_url = $2 AND source_ip = $3
            )
            "#,
        )
        .bind(target_post_id)
        .bind(source_url)
        .bind(source_ip)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn create(&self, new_pingback: NewPingback) -> Result<PingbackRecord, AppError> {
        let id = Uuid::new_v4();

        let ping_time_utc = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            INSERT INTO pingbacks
                (id, domain, source_url, source_title, target_post_id, target_post_title, source_ip)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING ping_time_utc
            "#,
        )
        .bind(id)
        .bind(&new_pingback.domain)
        .bind(&new_pingback.source_url)
        .bind(&new_pingback.source_title)
        .bind(new_pingback.target_post_id)
        .bind(&new_pingback.target_post_title)
        .bind(&new_pingback.source_ip)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on(&e, PINGBACK_UNIQUE_CONSTRAINT) {
                AppError::conflict(
                    "Pingback already registered",
                    json!({ "constraint": PINGBACK_UNIQUE_CONSTRAINT }),
                )
            } else {
                AppError::from(e)
            }
        })?;

        Ok(new_pingback.into_record(id, ping_time_utc))
    }

    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<PingbackRecord>, AppError> {
        let offset = (page - 1) * page_size;

        let rows = sqlx::query_as::<_, PingbackRow>(
            r#"
            SELECT id, domain, source_url, source_title, target_post_id,
                   target_post_title, ping_time_utc, source_ip
            FROM pingbacks
            ORDER BY ping_time_utc DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page_size)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(PingbackRecord::from).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pingbacks")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM pingbacks WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM pingbacks")
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}
