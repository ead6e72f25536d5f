//! Form page handlers

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, response::Html, Form};

use crate::features::TransactionInput;
use crate::page::{self, Outcome};
use crate::{pipeline, AppError, AppState};

fn model_name(state: &AppState) -> String {
    state
        .holder
        .metadata()
        .map(|m| m.model_name.clone())
        .unwrap_or_else(|| "an unloaded model".to_string())
}

/// Empty form with widget defaults
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(page::render(&TransactionInput::default(), &model_name(&state), Outcome::None))
}

/// Form submission: validate, assess, re-render with the verdict
pub async fn analyze(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> (StatusCode, Html<String>) {
    let name = model_name(&state);

    let input = match TransactionInput::from_form(&fields) {
        Ok(input) => input,
        Err(e) => {
            tracing::debug!("Rejected form input: {}", e);
            let err = AppError::from(e);
            let shown = TransactionInput::from_form_lossy(&fields);
            let html = page::render(&shown, &name, Outcome::Error(&err.message()));
            return (err.status(), Html(html));
        }
    };

    match pipeline::run(&state.holder, &input.to_vector()) {
        Ok(assessment) => {
            tracing::info!(
                category = ?assessment.verdict.category,
                probability = assessment.verdict.probability,
                "Transaction analyzed"
            );
            let html = page::render(&input, &name, Outcome::Verdict(&assessment));
            (StatusCode::OK, Html(html))
        }
        Err(e) => {
            let err = AppError::from(e);
            let html = page::render(&input, &name, Outcome::Error(&err.message()));
            (err.status(), Html(html))
        }
    }
}
