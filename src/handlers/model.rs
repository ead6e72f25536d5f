//! Model status handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::features::LayoutInfo;
use crate::model::EngineStatus;
use crate::AppState;

#[derive(Serialize)]
pub struct ModelStatusResponse {
    #[serde(flatten)]
    engine: EngineStatus,
    layout: LayoutInfo,
}

pub async fn status(State(state): State<AppState>) -> Json<ModelStatusResponse> {
    Json(ModelStatusResponse {
        engine: state.holder.status(),
        layout: LayoutInfo::current(),
    })
}
