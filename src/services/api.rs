// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP plumbing shared by the spot repository and the favorites ledger.
//!
//! Handles:
//! - Bearer token attachment (the token itself is opaque to us)
//! - Status code to `SpotError` mapping
//! - JSON decoding of success bodies (mutations tolerate acknowledgement-only bodies)

use crate::config::Config;
use crate::error::{Result, SpotError};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Thin client over the workout-spot store's REST API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for `base_url` with an optional bearer token.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Create a client from configuration, applying the request timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Fail before dispatch when a mutation has no credential to send.
    pub fn require_token(&self) -> Result<()> {
        if self.token.is_none() {
            return Err(SpotError::Unauthorized);
        }
        Ok(())
    }

    /// Join a path onto the base URL, percent-encoding each id segment.
    pub fn url(&self, path: &str, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}{}/{}", self.base_url, path, urlencoding::encode(id)),
            None => format!("{}{}", self.base_url, path),
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// GET with JSON response. Failures map as reads.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.request(Method::GET, url).send().await?;
        Self::check_response_json(response, SpotError::from_read_status).await
    }

    /// A read that carries a JSON body, such as a lookup by ids.
    pub async fn query_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.request(method, url).json(body).send().await?;
        Self::check_response_json(response, SpotError::from_read_status).await
    }

    /// Send a JSON body for a mutation. Any 2xx is success; the decoded body
    /// is returned only when the store echoes back something of type `T`.
    pub async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> Result<Option<T>> {
        let response = self.request(method, url).json(body).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response, SpotError::from_status).await);
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(error = %e, "Mutation succeeded but body was unreadable");
                return Ok(None);
            }
        };
        if bytes.is_empty() {
            return Ok(None);
        }
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::debug!(error = %e, "Mutation acknowledged without a record");
                Ok(None)
            }
        }
    }

    /// Send a request without a body, ignoring any success body.
    pub async fn send_empty(&self, method: Method, url: &str) -> Result<()> {
        let response = self.request(method, url).send().await?;
        Self::check_response(response).await
    }

    /// Like `send_empty`, but a `tolerated` status also counts as success.
    /// Returns `false` when the tolerated status was seen.
    pub async fn send_empty_tolerating(
        &self,
        method: Method,
        url: &str,
        tolerated: StatusCode,
    ) -> Result<bool> {
        let response = self.request(method, url).send().await?;
        if response.status() == tolerated {
            return Ok(false);
        }
        Self::check_response(response).await?;
        Ok(true)
    }

    /// Check response status and return error if not successful.
    async fn check_response(response: Response) -> Result<()> {
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::error_from(response, SpotError::from_status).await)
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: DeserializeOwned>(
        response: Response,
        classify: fn(StatusCode, &str) -> SpotError,
    ) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::error_from(response, classify).await);
        }

        response
            .json()
            .await
            .map_err(|e| SpotError::Unavailable(format!("JSON parse error: {}", e)))
    }

    async fn error_from(
        response: Response,
        classify: fn(StatusCode, &str) -> SpotError,
    ) -> SpotError {
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();

        if status.is_server_error() || status.as_u16() == 429 {
            tracing::warn!(status = %status, path = %url, "Spot store request failed");
        } else {
            tracing::debug!(status = %status, path = %url, "Spot store rejected request");
        }

        classify(status, body.trim())
    }
}
