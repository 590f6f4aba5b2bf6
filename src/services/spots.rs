// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spot repository: typed operations against the remote spot store.

use crate::error::Result;
use crate::models::spot::decode_spot_list;
use crate::models::{NewSpot, SpotId, SpotUpdate, WorkoutSpot};
use crate::services::api::ApiClient;
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const SPOTS_PATH: &str = "/workout-spots";
const BY_IDS_PATH: &str = "/workout-spots/by-ids";
const PROFILE_PATH: &str = "/profile";

/// Operations the reconciler needs from the spot store.
///
/// Ownership is decided by the store: `update` and `delete` surface
/// `Forbidden` rather than re-deriving it locally.
#[async_trait]
pub trait SpotStore: Send + Sync {
    /// Every spot the store knows about.
    async fn list_all(&self) -> Result<Vec<WorkoutSpot>>;

    /// Spots for the given ids. Missing ids are simply absent from the result.
    async fn list_by_ids(&self, ids: &[SpotId]) -> Result<Vec<WorkoutSpot>>;

    /// Spots created by the current user.
    async fn list_owned(&self) -> Result<Vec<WorkoutSpot>>;

    /// The stored record, when the store echoes one back.
    async fn create(&self, spot: &NewSpot) -> Result<Option<WorkoutSpot>>;

    /// The updated record, when the store echoes one back.
    async fn update(&self, id: &SpotId, fields: &SpotUpdate) -> Result<Option<WorkoutSpot>>;

    /// Returns `NotFound` if the spot is already gone.
    async fn delete(&self, id: &SpotId) -> Result<()>;
}

#[derive(Serialize)]
struct ByIdsRequest<'a> {
    ids: &'a [SpotId],
}

/// The subset of the profile document we read.
#[derive(Deserialize)]
struct Profile {
    #[serde(default)]
    added_spots: Vec<SpotId>,
}

/// HTTP-backed spot store.
#[derive(Clone)]
pub struct SpotRepository {
    api: ApiClient,
}

impl SpotRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SpotStore for SpotRepository {
    async fn list_all(&self) -> Result<Vec<WorkoutSpot>> {
        let values: Vec<Value> = self.api.get_json(&self.api.url(SPOTS_PATH, None)).await?;
        let spots = decode_spot_list(values);
        tracing::debug!(count = spots.len(), "Fetched all spots");
        Ok(spots)
    }

    async fn list_by_ids(&self, ids: &[SpotId]) -> Result<Vec<WorkoutSpot>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let values: Vec<Value> = self
            .api
            .query_json(
                Method::POST,
                &self.api.url(BY_IDS_PATH, None),
                &ByIdsRequest { ids },
            )
            .await?;
        let spots = decode_spot_list(values);
        tracing::debug!(
            requested = ids.len(),
            returned = spots.len(),
            "Fetched spots by id"
        );
        Ok(spots)
    }

    async fn list_owned(&self) -> Result<Vec<WorkoutSpot>> {
        let profile: Profile = self.api.get_json(&self.api.url(PROFILE_PATH, None)).await?;
        self.list_by_ids(&profile.added_spots).await
    }

    async fn create(&self, spot: &NewSpot) -> Result<Option<WorkoutSpot>> {
        spot.check()?;
        self.api.require_token()?;

        let created: Option<WorkoutSpot> = self
            .api
            .send_json(Method::POST, &self.api.url(SPOTS_PATH, None), spot)
            .await?;
        match &created {
            Some(created) => tracing::info!(
                spot_id = %created.id,
                category = created.category.as_str(),
                "Spot created"
            ),
            None => tracing::info!(category = spot.category.as_str(), "Spot created"),
        }
        Ok(created)
    }

    async fn update(&self, id: &SpotId, fields: &SpotUpdate) -> Result<Option<WorkoutSpot>> {
        fields.check()?;
        self.api.require_token()?;

        let updated: Option<WorkoutSpot> = self
            .api
            .send_json(
                Method::PUT,
                &self.api.url(SPOTS_PATH, Some(id.as_str())),
                fields,
            )
            .await?;
        tracing::info!(spot_id = %id, "Spot updated");
        Ok(updated)
    }

    async fn delete(&self, id: &SpotId) -> Result<()> {
        self.api.require_token()?;

        self.api
            .send_empty(Method::DELETE, &self.api.url(SPOTS_PATH, Some(id.as_str())))
            .await?;
        tracing::info!(spot_id = %id, "Spot deleted");
        Ok(())
    }
}
