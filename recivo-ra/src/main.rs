//! recivo-ra - Receipt Analysis Microservice
//!
//! Accepts an uploaded receipt file name, resolves it to a storage path,
//! classifies the image through the external classification API, and
//! records every attempt in the audit log.

use anyhow::Result;
use recivo_common::config::ServiceConfig;
use recivo_ra::services::{
    ClassificationApiClient, ClassifyOrchestrator, MockUploadService, SqliteAnalysisLogStore,
};
use recivo_ra::AppState;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting recivo-ra (Receipt Analysis) microservice");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration (env > file > defaults)
    let config = ServiceConfig::load()?;
    info!("Database: {}", config.database_path.display());
    info!("Classifier: {}", config.classifier.base_url);

    // Initialize database connection pool
    let db_pool = recivo_ra::db::init_database_pool(&config.database_path).await?;
    info!("Database connection established");

    // Wire the pipeline collaborators
    let upload = Arc::new(MockUploadService::new());
    let classifier = Arc::new(
        ClassificationApiClient::new(
            config.classifier.base_url.as_str(),
            Duration::from_secs(config.classifier.timeout_seconds),
        )
        .map_err(|e| anyhow::anyhow!("Failed to create classification client: {e}"))?,
    );
    let store = Arc::new(SqliteAnalysisLogStore::new(db_pool));
    let orchestrator = Arc::new(ClassifyOrchestrator::new(upload, classifier, store));

    // Create application state and router
    let state = AppState::new(orchestrator);
    let app = recivo_ra::build_router(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}");
    info!("Health check: http://{addr}/health");

    axum::serve(listener, app).await?;

    Ok(())
}
