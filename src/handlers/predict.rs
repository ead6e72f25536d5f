//! JSON prediction handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::features::TransactionInput;
use crate::verdict::{Category, RiskLevel};
use crate::{pipeline, AppResult, AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub label: u8,
    pub category: Category,
    pub probability: f64,
    pub probability_percent: String,
    pub risk: RiskLevel,
    pub recommendation: String,
    pub model: String,
    pub inference_time_us: u64,
}

/// Assess one transaction
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<TransactionInput>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    let assessment = pipeline::run(&state.holder, &req.to_vector())?;
    let verdict = &assessment.verdict;

    Ok(Json(PredictResponse {
        label: verdict.label,
        category: verdict.category,
        probability: verdict.probability,
        probability_percent: verdict.probability_percent(),
        risk: verdict.risk,
        recommendation: verdict.recommendation().to_string(),
        model: assessment.model.clone(),
        inference_time_us: assessment.inference_time_us,
    }))
}
