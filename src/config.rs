// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.

use crate::services::proximity::DEFAULT_NEARBY_RADIUS_KM;
use std::env;
use std::time::Duration;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the workout-spot store (no trailing slash needed)
    pub api_url: String,
    /// Opaque bearer token supplied by the auth collaborator
    pub api_token: Option<String>,
    /// Radius used by the "nearby spots" view
    pub nearby_radius_km: f64,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            api_token: Some("test_token".to_string()),
            nearby_radius_km: DEFAULT_NEARBY_RADIUS_KM,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let nearby_radius_km = match env::var("NEARBY_RADIUS_KM") {
            Ok(v) => {
                let radius: f64 = v
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("NEARBY_RADIUS_KM", v.clone()))?;
                if !radius.is_finite() || radius < 0.0 {
                    return Err(ConfigError::Invalid("NEARBY_RADIUS_KM", v));
                }
                radius
            }
            Err(_) => DEFAULT_NEARBY_RADIUS_KM,
        };

        Ok(Self {
            api_url: env::var("SPOTS_API_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("SPOTS_API_URL"))?,
            api_token: env::var("SPOTS_API_TOKEN")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            nearby_radius_km,
            request_timeout: Duration::from_secs(
                env::var("HTTP_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            ),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
