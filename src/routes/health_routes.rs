use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::dto::api_response::ApiResponse;
use crate::state::AppState;

pub fn create_health_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Health check público: 503 si el almacenamiento no responde
async fn health_check(State(state): State<AppState>) -> Response {
    let backend = state.store.backend_name();
    match state.store.ping().await {
        Ok(()) => Json(ApiResponse::success(json!({
            "status": "ok",
            "database": "connected",
            "backend": backend,
            "version": env!("CARGO_PKG_VERSION"),
        })))
        .into_response(),
        Err(e) => {
            tracing::error!("❌ Health check fallido ({}): {}", backend, e);
            let body = ApiResponse {
                success: false,
                data: Some(json!({
                    "status": "degraded",
                    "database": "unreachable",
                    "backend": backend,
                })),
                error: Some("Service unavailable".to_string()),
                count: None,
                message: None,
            };
            (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
        }
    }
}
