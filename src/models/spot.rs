// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout spot model and the create/update payloads.

use crate::error::{Result, SpotError};
use crate::models::Coordinate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Longest description the store accepts.
pub const MAX_DESCRIPTION_LEN: u64 = 500;

/// Shown in place of a missing description.
pub const DEFAULT_DESCRIPTION: &str = "-";

/// Opaque, store-assigned spot identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpotId(String);

impl SpotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpotId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SpotId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Kind of workout a spot is good for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Category {
    #[default]
    General,
    Running,
    Cycling,
    Swimming,
    Yoga,
    TeamSports,
    Strength,
    #[serde(other)]
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::General,
        Category::Running,
        Category::Cycling,
        Category::Swimming,
        Category::Yoga,
        Category::TeamSports,
        Category::Strength,
        Category::Other,
    ];

    /// Parse the wire name; anything unrecognised is `Other`.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "general" => Category::General,
            "running" => Category::Running,
            "cycling" => Category::Cycling,
            "swimming" => Category::Swimming,
            "yoga" => Category::Yoga,
            "team_sports" => Category::TeamSports,
            "strength" => Category::Strength,
            _ => Category::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Running => "running",
            Category::Cycling => "cycling",
            Category::Swimming => "swimming",
            Category::Yoga => "yoga",
            Category::TeamSports => "team_sports",
            Category::Strength => "strength",
            Category::Other => "other",
        }
    }

    /// Human-readable label for badges.
    pub fn label(self) -> &'static str {
        match self {
            Category::General => "General Fitness",
            Category::Running => "Running",
            Category::Cycling => "Cycling",
            Category::Swimming => "Swimming",
            Category::Yoga => "Yoga",
            Category::TeamSports => "Team Sports",
            Category::Strength => "Strength Training",
            Category::Other => "Other",
        }
    }
}

/// A geotagged, categorized workout location.
///
/// The owner is assigned by the store at creation and is only readable here;
/// nothing in this crate can change it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSpot")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutSpot {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub id: SpotId,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "type")]
    pub category: Category,
    pub description: Option<String>,
    #[serde(rename = "ownerEmail", skip_serializing_if = "Option::is_none")]
    owner_email: Option<String>,
}

impl WorkoutSpot {
    pub fn new(id: impl Into<SpotId>, coordinate: Coordinate, category: Category) -> Self {
        Self {
            id: id.into(),
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            category,
            description: None,
            owner_email: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_owner(mut self, owner_email: impl Into<String>) -> Self {
        self.owner_email = Some(owner_email.into());
        self
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner_email.as_deref()
    }

    /// Description for display, falling back to a placeholder.
    pub fn display_description(&self) -> &str {
        match self.description.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => d,
            _ => DEFAULT_DESCRIPTION,
        }
    }
}

/// Wire shape of a spot record, tolerant of the store's variations.
#[derive(Deserialize)]
struct RawSpot {
    id: Option<SpotId>,
    #[serde(rename = "_id")]
    mongo_id: Option<SpotId>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(rename = "type")]
    category: Option<Value>,
    description: Option<String>,
    #[serde(rename = "ownerEmail")]
    owner_email: Option<String>,
}

impl TryFrom<RawSpot> for WorkoutSpot {
    type Error = String;

    fn try_from(raw: RawSpot) -> std::result::Result<Self, Self::Error> {
        let id = raw
            .id
            .or(raw.mongo_id)
            .ok_or_else(|| "spot record has no id".to_string())?;
        let (latitude, longitude) = match (raw.latitude, raw.longitude) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => return Err(format!("spot {} has no coordinate", id)),
        };
        Coordinate::new(latitude, longitude)
            .validate()
            .map_err(|e| format!("spot {}: {}", id, e))?;

        let category = match raw.category {
            Some(Value::String(s)) => Category::from_wire(&s),
            _ => Category::Other,
        };

        Ok(Self {
            id,
            latitude,
            longitude,
            category,
            description: raw.description,
            owner_email: raw.owner_email,
        })
    }
}

/// Decode a list of spot records, dropping elements that are not valid spots.
pub fn decode_spot_list(values: Vec<Value>) -> Vec<WorkoutSpot> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<WorkoutSpot>(value) {
            Ok(spot) => Some(spot),
            Err(e) => {
                tracing::debug!(error = %e, "Dropping malformed spot record");
                None
            }
        })
        .collect()
}

/// Payload for creating a spot.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewSpot {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[serde(rename = "type")]
    pub category: Category,
    #[validate(length(max = 500))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewSpot {
    pub fn new(coordinate: Coordinate, category: Category) -> Self {
        Self {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            category,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks run before the request is dispatched.
    pub fn check(&self) -> Result<()> {
        Coordinate::new(self.latitude, self.longitude).validate()?;
        self.validate()?;
        Ok(())
    }
}

/// Owner-editable fields. Unset fields are left alone by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct SpotUpdate {
    #[validate(length(max = 500))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl SpotUpdate {
    pub fn check(&self) -> Result<()> {
        if self.description.is_none() && self.category.is_none() {
            return Err(SpotError::Invalid("update has no fields".to_string()));
        }
        self.validate()?;
        Ok(())
    }
}
