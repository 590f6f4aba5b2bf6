// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory view model consumed by the presentation layer.
//!
//! The reconciler is the only writer; callers get cloned snapshots.

use crate::models::{Coordinate, SpotId, WorkoutSpot};
use chrono::{DateTime, Utc};
use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// In-flight mutation on a single spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum PendingOp {
    AddFavorite,
    RemoveFavorite,
    Delete,
}

/// Global load state of the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum LoadState {
    #[default]
    Empty,
    Loading,
    Loaded,
    Failed,
}

/// Which list the projection is showing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    Nearby {
        reference: Coordinate,
        radius_km: f64,
    },
    Owned,
    Favorites,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewProjection {
    /// Displayed spots, in store order.
    pub spots: Vec<WorkoutSpot>,
    pub favorites: BTreeSet<SpotId>,
    /// Present only while a mutation on that id is in flight.
    pub pending: BTreeMap<SpotId, PendingOp>,
    pub load_state: LoadState,
    pub view: Option<View>,
    /// When the last successful load was applied.
    pub loaded_at: Option<DateTime<Utc>>,
}

impl ViewProjection {
    pub fn contains(&self, id: &SpotId) -> bool {
        self.spots.iter().any(|s| &s.id == id)
    }

    pub fn get(&self, id: &SpotId) -> Option<&WorkoutSpot> {
        self.spots.iter().find(|s| &s.id == id)
    }

    pub fn is_favorite(&self, id: &SpotId) -> bool {
        self.favorites.contains(id)
    }

    pub fn pending_op(&self, id: &SpotId) -> Option<PendingOp> {
        self.pending.get(id).copied()
    }

    pub fn spot_ids(&self) -> Vec<&SpotId> {
        self.spots.iter().map(|s| &s.id).collect()
    }

    /// Displayed pins as a GeoJSON layer for the map view.
    pub fn to_geojson(&self) -> FeatureCollection {
        let features = self
            .spots
            .iter()
            .map(|spot| {
                let point: geo::Point<f64> = spot.coordinate().into();

                let mut properties = JsonObject::new();
                properties.insert("type".to_string(), spot.category.as_str().into());
                properties.insert("label".to_string(), spot.category.label().into());
                properties.insert(
                    "description".to_string(),
                    spot.display_description().into(),
                );
                properties.insert("favorite".to_string(), self.is_favorite(&spot.id).into());
                if let Some(op) = self.pending_op(&spot.id) {
                    properties.insert(
                        "pending".to_string(),
                        serde_json::to_value(op).unwrap_or_default(),
                    );
                }

                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(geojson::Value::from(&point))),
                    id: Some(Id::String(spot.id.to_string())),
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}
