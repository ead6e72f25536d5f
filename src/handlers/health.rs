//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    model_loaded: bool,
    model: Option<String>,
    timestamp: i64,
}

/// Liveness plus whether the model is resident
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let model = state.holder.metadata().map(|m| m.model_name.clone());

    Json(HealthResponse {
        status: if model.is_some() { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        model_loaded: state.holder.is_loaded(),
        model,
        timestamp: chrono::Utc::now().timestamp(),
    })
}
