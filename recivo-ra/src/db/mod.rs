//! Database access for recivo-ra

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Opens (or creates) the SQLite database and ensures the schema exists.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create recivo-ra tables if they don't exist
///
/// `analysis_attempts` is insert-only: one row per pipeline invocation,
/// success or failure. Timestamps are RFC 3339 text.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS analysis_attempts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            image_path TEXT,
            success INTEGER NOT NULL,
            message TEXT,
            class INTEGER,
            confidence REAL,
            request_timestamp TEXT NOT NULL,
            response_timestamp TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (analysis_attempts)");

    Ok(())
}
