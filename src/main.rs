//! Credit Card Fraud Detector - server entry point

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fraud_detector::{
    config::Config,
    create_router,
    model::{check_feature_count, ModelHolder},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fraud_detector=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Credit Card Fraud Detector starting...");
    tracing::info!("Environment: {}", config.environment);

    // The model must be resident before the first request; no fallback
    let holder = Arc::new(ModelHolder::new(&config.model_path));
    let loaded = holder
        .get()
        .with_context(|| format!("failed to load model artifact {}", config.model_path.display()))?;
    check_feature_count(loaded).context("model artifact does not fit the form")?;
    tracing::info!("Model ready: {} ({} features)", loaded.metadata.model_name, loaded.metadata.features);

    let state = AppState { holder };

    let app = create_router(state);

    let ip = config.host.parse::<std::net::IpAddr>()
        .with_context(|| format!("invalid HOST {:?}", config.host))?;
    let addr = SocketAddr::from((ip, config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
