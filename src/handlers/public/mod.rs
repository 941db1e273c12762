use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::config::{self, StorageBackend};
use crate::database::DatabaseManager;

/// GET / - service info
pub async fn root_info() -> Json<serde_json::Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Secret Vault API",
            "version": version,
            "description": "Multi-tenant secrets storage with filtered, paginated listings",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "secrets": "/secrets[/:id] (bearer token required)",
            }
        }
    }))
}

/// GET /health - liveness plus a storage probe
pub async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    match config::config().database.storage {
        StorageBackend::Memory => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "storage": "memory"
                }
            })),
        ),
        StorageBackend::Postgres => match DatabaseManager::health_check().await {
            Ok(_) => (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "data": {
                        "status": "ok",
                        "timestamp": now,
                        "storage": "postgres"
                    }
                })),
            ),
            Err(e) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database_error": e.to_string()
                    }
                })),
            ),
        },
    }
}
