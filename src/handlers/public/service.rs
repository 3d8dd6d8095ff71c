// handlers/public/service.rs - service info and health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::state::AppState;

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "SmartPantry API",
        "version": env!("CARGO_PKG_VERSION"),
        "message": "SmartPantry backend running!",
        "endpoints": {
            "auth": "/api/register, /api/login (public), /api/auth/whoami (token)",
            "products": "/api/products, /api/products/search?q=, /api/products/:id",
            "gifts": "/api/gift-bundles (public), /api/gift-bundles/history (token)",
            "health": "/health"
        }
    }))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
