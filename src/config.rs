//! Configuration module

use std::env;
use std::path::PathBuf;

/// Default location of the serialized classifier
pub const DEFAULT_MODEL_PATH: &str = "models/credit_fraud_model.json";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8501;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Model artifact path
    pub model_path: PathBuf,

    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            host: env::var("HOST")
                .unwrap_or(defaults.host),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),
        }
    }

    /// Production switches the logs to JSON lines
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
