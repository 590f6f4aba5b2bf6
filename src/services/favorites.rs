// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorites ledger: the current user's favorite spot references.

use crate::error::Result;
use crate::models::favorite::decode_favorite_ids;
use crate::models::SpotId;
use crate::services::api::ApiClient;
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;

const FAVORITES_PATH: &str = "/favorites";

/// Favorite refs are unique per (user, spot): `add` and `remove` are
/// idempotent from the caller's point of view.
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    async fn list(&self) -> Result<Vec<SpotId>>;

    async fn add(&self, id: &SpotId) -> Result<()>;

    async fn remove(&self, id: &SpotId) -> Result<()>;
}

/// HTTP-backed favorites ledger.
#[derive(Clone)]
pub struct FavoritesLedger {
    api: ApiClient,
}

impl FavoritesLedger {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl FavoriteStore for FavoritesLedger {
    async fn list(&self) -> Result<Vec<SpotId>> {
        let values: Vec<Value> = self
            .api
            .get_json(&self.api.url(FAVORITES_PATH, None))
            .await?;
        Ok(decode_favorite_ids(values))
    }

    async fn add(&self, id: &SpotId) -> Result<()> {
        self.api.require_token()?;

        let url = self.api.url(FAVORITES_PATH, Some(id.as_str()));
        let created = self
            .api
            .send_empty_tolerating(Method::POST, &url, StatusCode::CONFLICT)
            .await?;
        if created {
            tracing::info!(spot_id = %id, "Favorite added");
        } else {
            tracing::debug!(spot_id = %id, "Spot already favorited");
        }
        Ok(())
    }

    async fn remove(&self, id: &SpotId) -> Result<()> {
        self.api.require_token()?;

        let url = self.api.url(FAVORITES_PATH, Some(id.as_str()));
        let removed = self
            .api
            .send_empty_tolerating(Method::DELETE, &url, StatusCode::NOT_FOUND)
            .await?;
        if removed {
            tracing::info!(spot_id = %id, "Favorite removed");
        } else {
            tracing::debug!(spot_id = %id, "Favorite was not set");
        }
        Ok(())
    }
}
