//! Audit record persistence
//!
//! Attempts are stored in the `analysis_attempts` table with RFC 3339
//! text timestamps. Records are insert-only; nothing here updates or
//! deletes.

use crate::models::AnalysisAttempt;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use thiserror::Error;

/// Persistence failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to decode stored attempt: {0}")]
    Decode(String),
}

/// Audit store capability consumed by the pipeline
#[async_trait]
pub trait AnalysisLogStore: Send + Sync {
    /// Insert the attempt and return it with the assigned id
    async fn save(&self, attempt: AnalysisAttempt) -> Result<AnalysisAttempt, StoreError>;

    /// Most recent attempts, newest `requested_at` first
    async fn find_recent(&self, limit: u32) -> Result<Vec<AnalysisAttempt>, StoreError>;
}

/// SQLite-backed audit store
pub struct SqliteAnalysisLogStore {
    pool: SqlitePool,
}

impl SqliteAnalysisLogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisLogStore for SqliteAnalysisLogStore {
    async fn save(&self, attempt: AnalysisAttempt) -> Result<AnalysisAttempt, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO analysis_attempts (
                image_path, success, message, class, confidence,
                request_timestamp, response_timestamp
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&attempt.image_path)
        .bind(attempt.success as i64)
        .bind(&attempt.message)
        .bind(attempt.class_label)
        .bind(attempt.confidence)
        .bind(attempt.requested_at.to_rfc3339())
        .bind(attempt.responded_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::debug!(id, success = attempt.success, "Persisted analysis attempt");

        Ok(AnalysisAttempt {
            id: Some(id),
            ..attempt
        })
    }

    async fn find_recent(&self, limit: u32) -> Result<Vec<AnalysisAttempt>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, image_path, success, message, class, confidence,
                   request_timestamp, response_timestamp
            FROM analysis_attempts
            ORDER BY request_timestamp DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(AnalysisAttempt {
                    id: Some(row.try_get::<i64, _>("id")?),
                    image_path: row.try_get("image_path")?,
                    success: row.try_get::<i64, _>("success")? != 0,
                    message: row.try_get("message")?,
                    class_label: row.try_get("class")?,
                    confidence: row.try_get("confidence")?,
                    requested_at: parse_timestamp(row.try_get("request_timestamp")?)?,
                    responded_at: parse_timestamp(row.try_get("response_timestamp")?)?,
                })
            })
            .collect()
    }
}

fn parse_timestamp(text: String) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Decode(format!("bad timestamp '{text}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{Confidence, ImagePath};

    async fn test_store() -> SqliteAnalysisLogStore {
        // Single connection so the in-memory database is shared
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory database");
        db::init_tables(&pool).await.expect("schema");
        SqliteAnalysisLogStore::new(pool)
    }

    fn success_attempt(confidence: f64) -> AnalysisAttempt {
        let requested = Utc::now();
        AnalysisAttempt::success_record(
            ImagePath::parse("/image/abc/receipt.jpg").unwrap(),
            "success".to_string(),
            Some(2),
            Some(Confidence::new(confidence).unwrap()),
            requested,
            requested + chrono::Duration::milliseconds(50),
        )
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids() {
        let store = test_store().await;

        let first = store.save(success_attempt(0.9)).await.unwrap();
        let second = store.save(success_attempt(0.8)).await.unwrap();

        assert!(first.id.is_some());
        assert!(second.id.is_some());
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn save_round_trips_all_fields() {
        let store = test_store().await;
        let saved = store.save(success_attempt(0.9234)).await.unwrap();

        let found = store.find_recent(10).await.unwrap();
        assert_eq!(found.len(), 1);
        let loaded = &found[0];

        assert_eq!(loaded.id, saved.id);
        assert_eq!(loaded.image_path.as_deref(), Some("/image/abc/receipt.jpg"));
        assert!(loaded.success);
        assert_eq!(loaded.message.as_deref(), Some("success"));
        assert_eq!(loaded.class_label, Some(2));
        assert_eq!(loaded.confidence, Some(0.9234));
        assert_eq!(loaded.requested_at, saved.requested_at);
        assert_eq!(loaded.responded_at, saved.responded_at);
    }

    #[tokio::test]
    async fn failure_record_round_trips_null_fields() {
        let store = test_store().await;
        let requested = Utc::now();
        let attempt = AnalysisAttempt::failure_record(
            None,
            "Error:E40004 - no stored image for file name: x.jpg".to_string(),
            requested,
            requested,
        );

        store.save(attempt).await.unwrap();
        let found = store.find_recent(10).await.unwrap();

        assert_eq!(found[0].image_path, None);
        assert!(!found[0].success);
        assert_eq!(found[0].class_label, None);
        assert_eq!(found[0].confidence, None);
    }

    #[tokio::test]
    async fn find_recent_orders_newest_first_and_honors_limit() {
        let store = test_store().await;
        let base = Utc::now();

        for i in 0..5 {
            let requested = base + chrono::Duration::seconds(i);
            let attempt = AnalysisAttempt::failure_record(
                None,
                format!("attempt {i}"),
                requested,
                requested,
            );
            store.save(attempt).await.unwrap();
        }

        let found = store.find_recent(3).await.unwrap();
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].message.as_deref(), Some("attempt 4"));
        assert_eq!(found[1].message.as_deref(), Some("attempt 3"));
        assert_eq!(found[2].message.as_deref(), Some("attempt 2"));
    }
}
