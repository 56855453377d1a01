use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::database::connection::DatabaseManager;
use crate::database::models::{Product, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Healthy,
    Unhealthy,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: Status,
    pub version: String,
    pub checked_at: DateTime<Utc>,
    pub uptime_seconds: i64,
    pub database: DatabaseStatus,
    pub catalog: CatalogCounts,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseStatus {
    pub status: Status,
    pub pool_size: u32,
    pub ping_ms: u64,
}

/// Row counts, zero when the tables cannot be read.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CatalogCounts {
    pub products: i64,
    pub active_products: i64,
    pub users: i64,
}

#[derive(Clone)]
struct HealthState {
    db: Arc<DatabaseManager>,
    started_at: DateTime<Utc>,
}

/// Probe endpoints for the container runtime.
pub struct HealthService {
    pub router: Router,
}

impl HealthService {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        let state = HealthState {
            db,
            started_at: Utc::now(),
        };

        let router = Router::new()
            .route("/health", get(health))
            .route("/health/ready", get(ready))
            .route("/health/live", get(live))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        Self { router }
    }
}

async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthReport>) {
    let started = Instant::now();
    let db_status = match state.db.ping().await {
        Ok(()) => Status::Healthy,
        Err(e) => {
            tracing::warn!("Database ping failed: {}", e);
            Status::Unhealthy
        }
    };
    let ping_ms = started.elapsed().as_millis() as u64;

    let catalog = if db_status == Status::Healthy {
        catalog_counts(&state.db).await
    } else {
        CatalogCounts::default()
    };

    let now = Utc::now();
    let report = HealthReport {
        status: db_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checked_at: now,
        uptime_seconds: now.signed_duration_since(state.started_at).num_seconds(),
        database: DatabaseStatus {
            status: db_status,
            pool_size: state.db.pool.size(),
            ping_ms,
        },
        catalog,
    };

    let code = match report.status {
        Status::Healthy => StatusCode::OK,
        Status::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (code, Json(report))
}

async fn ready(State(state): State<HealthState>) -> Result<Json<&'static str>, StatusCode> {
    state
        .db
        .ping()
        .await
        .map(|()| Json("ready"))
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)
}

async fn live() -> Json<&'static str> {
    Json("alive")
}

async fn catalog_counts(db: &DatabaseManager) -> CatalogCounts {
    let counts = async {
        Ok::<_, sqlx::Error>(CatalogCounts {
            products: Product::count(&db.pool).await?,
            active_products: Product::count_active(&db.pool).await?,
            users: User::count(&db.pool).await?,
        })
    };

    counts.await.unwrap_or_else(|e| {
        tracing::warn!("Could not count catalog rows: {}", e);
        CatalogCounts::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use serde_json::Value;
    use tempfile::TempDir;

    async fn test_server() -> (TestServer, Arc<DatabaseManager>, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
        let db = Arc::new(DatabaseManager::new(&db_url).await.expect("Failed to create test database"));
        db.run_migrations().await.expect("Failed to run migrations");

        let server = TestServer::new(HealthService::new(db.clone()).router).expect("Failed to create test server");
        (server, db, temp_dir)
    }

    #[tokio::test]
    async fn test_health_reports_empty_catalog() {
        let (server, _db, _temp_dir) = test_server().await;

        let response = server.get("/health").await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"]["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["catalog"]["products"], 0);
        assert_eq!(body["catalog"]["users"], 0);
        assert!(body["uptime_seconds"].as_i64().is_some_and(|s| s >= 0));
    }

    #[tokio::test]
    async fn test_health_counts_rows() {
        let (server, db, _temp_dir) = test_server().await;
        User::record_activity(&db.pool, 42, Some("budi"), "Budi", Some(true))
            .await
            .expect("Failed to insert user");

        let report: HealthReport = server.get("/health").await.json();
        assert_eq!(report.status, Status::Healthy);
        assert_eq!(report.catalog.users, 1);
        assert_eq!(report.catalog.active_products, 0);
    }

    #[tokio::test]
    async fn test_health_after_pool_closed() {
        let (server, db, _temp_dir) = test_server().await;
        db.pool.close().await;

        let response = server.get("/health").await;
        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let body: Value = response.json();
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["catalog"]["products"], 0);

        let ready = server.get("/health/ready").await;
        assert_eq!(ready.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_ready_and_live() {
        let (server, _db, _temp_dir) = test_server().await;

        let ready: String = server.get("/health/ready").await.json();
        assert_eq!(ready, "ready");

        let alive: String = server.get("/health/live").await.json();
        assert_eq!(alive, "alive");
    }
}
