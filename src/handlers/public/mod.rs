// handlers/public/mod.rs - Public handlers (no authentication required)
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Recipe API",
        "version": version,
        "endpoints": {
            "health": "/health (public)",
            "user": "/api/user/me (protected)",
            "ingredients": "/api/recipe/ingredients[/:id] (protected, ?assigned_only=1)",
            "tags": "/api/recipe/tags[/:id] (protected, ?assigned_only=1)",
            "recipes": "/api/recipe/recipes[/:id] (protected, ?tags=1,2&ingredients=3)",
        }
    }))
}

/// GET /health - liveness plus a store round trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
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
