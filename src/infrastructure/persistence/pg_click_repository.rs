//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::ClickEvent;
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ClickRow {
    url_id: String,
    timestamp: DateTime<Utc>,
    user_agent: Option<String>,
    ip_address: Option<String>,
    referer: Option<String>,
}

/// PostgreSQL repository for the append-only click log.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record(&self, event: ClickEvent) -> Result<String, AppError> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO click_events (id, url_id, "timestamp", user_agent, ip_address, referer)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&id)
        .bind(&event.url_id)
        .bind(event.timestamp)
        .bind(&event.user_agent)
        .bind(&event.ip_address)
        .bind(&event.referer)
        .execute(self.pool.as_ref())
        .await?;

        Ok(id)
    }

    async fn list_for_link(
        &self,
        url_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<ClickEvent>, AppError> {
        let rows = sqlx::query_as::<_, ClickRow>(
            r#"
            SELECT url_id, "timestamp", user_agent, ip_address, referer
            FROM click_events
            WHERE url_id = $1
            ORDER BY "timestamp" DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(url_id)
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ClickEvent::new(r.url_id, r.timestamp, r.user_agent, r.ip_address, r.referer))
            .collect())
    }
}
