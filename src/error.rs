// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error taxonomy shared by the store clients and the reconciler.

use reqwest::StatusCode;

/// Every remote or validation failure surfaces as one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpotError {
    /// Transport failure or an unexpected store response. Retryable.
    #[error("Spot store unavailable: {0}")]
    Unavailable(String),

    /// Missing or rejected bearer token.
    #[error("Authentication required")]
    Unauthorized,

    /// The store refused the mutation because the caller is not the owner.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid request: {0}")]
    Invalid(String),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl SpotError {
    /// Only transport-level failures are worth re-invoking the same call for.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SpotError::Unavailable(_))
    }

    /// Map a non-success HTTP status (and its body) to the taxonomy.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let detail = if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            format!("HTTP {}: {}", status, body)
        };

        match status.as_u16() {
            400 | 409 | 422 => SpotError::Invalid(detail),
            401 => SpotError::Unauthorized,
            403 => SpotError::Forbidden(detail),
            404 => SpotError::NotFound(detail),
            _ => SpotError::Unavailable(detail),
        }
    }

    /// Mapping for reads: apart from a rejected token, any non-success
    /// status means the list could not be fetched.
    pub fn from_read_status(status: StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 => SpotError::Unauthorized,
            _ if body.is_empty() => SpotError::Unavailable(format!("HTTP {}", status)),
            _ => SpotError::Unavailable(format!("HTTP {}: {}", status, body)),
        }
    }
}

impl From<reqwest::Error> for SpotError {
    fn from(err: reqwest::Error) -> Self {
        SpotError::Unavailable(err.to_string())
    }
}

impl From<validator::ValidationErrors> for SpotError {
    fn from(err: validator::ValidationErrors) -> Self {
        SpotError::Invalid(err.to_string())
    }
}

/// Result type alias for store and reconciler operations.
pub type Result<T> = std::result::Result<T, SpotError>;
