//! Credit Card Fraud Detector
//!
//! Single-page form that collects the 29 transaction features, runs them
//! through a pre-trained classifier and renders the risk verdict.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                  FRAUD DETECTOR                            │
//! ├────────────────────────────────────────────────────────────┤
//! │  form / JSON ──► TransactionInput ──► FeatureVector        │
//! │                  (validator)          (layout order)       │
//! │                                            │               │
//! │                                            ▼               │
//! │  Verdict ◄── pipeline::assess ◄── ModelHolder (OnceCell)   │
//! │                                    └─ dyn Classifier       │
//! │                                       (forest / logistic   │
//! │                                        / onnx)             │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod features;
pub mod handlers;
pub mod model;
pub mod page;
pub mod pipeline;
pub mod verdict;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    trace::TraceLayer,
};

use model::ModelHolder;

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub holder: Arc<ModelHolder>,
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    // Page
    let page_routes = Router::new()
        .route("/", get(handlers::form::index))
        .route("/analyze", post(handlers::form::analyze));

    // JSON API
    let api_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/predict", post(handlers::predict::predict))
        .route("/api/v1/model", get(handlers::model::status));

    Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
