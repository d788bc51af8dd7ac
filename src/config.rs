use std::env;
use std::path::PathBuf;

use crate::error::AppError;

const ENVIRONMENTS: [&str; 3] = ["development", "staging", "production"];

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    /// Where exported documents are saved.
    pub output_dir: PathBuf,
    pub otel_service_name: String,
    /// Telemetry export is off when unset.
    pub otel_exporter_endpoint: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let environment =
            lookup("LANDSCAPE_ENVIRONMENT").unwrap_or_else(|| "development".to_string());
        if !ENVIRONMENTS.contains(&environment.as_str()) {
            return Err(AppError::Config(format!(
                "LANDSCAPE_ENVIRONMENT must be one of {}, got {environment:?}",
                ENVIRONMENTS.join(", ")
            )));
        }

        let output_dir = match lookup("LANDSCAPE_OUTPUT_DIR") {
            Some(dir) if dir.trim().is_empty() => {
                return Err(AppError::Config("LANDSCAPE_OUTPUT_DIR is empty".to_string()));
            }
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from("."),
        };

        let otel_exporter_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT")
            .filter(|endpoint| !endpoint.is_empty());
        if let Some(endpoint) = &otel_exporter_endpoint
            && !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(AppError::Config(format!(
                "OTEL_EXPORTER_OTLP_ENDPOINT must be an http(s) URL, got {endpoint:?}"
            )));
        }

        Ok(Self {
            environment,
            output_dir,
            otel_service_name: lookup("OTEL_SERVICE_NAME")
                .unwrap_or_else(|| "landscape-report".to_string()),
            otel_exporter_endpoint,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn telemetry_enabled(&self) -> bool {
        self.otel_exporter_endpoint.is_some()
    }
}
