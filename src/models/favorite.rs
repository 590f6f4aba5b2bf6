// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorite references as returned by the ledger.

use crate::models::SpotId;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

/// One element of the favorites list. The ledger may return bare ids or the
/// full spot records they point at.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawEntry")]
pub enum FavoriteEntry {
    Id(SpotId),
    Record { id: SpotId },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Id(SpotId),
    Record {
        id: Option<SpotId>,
        #[serde(rename = "_id")]
        mongo_id: Option<SpotId>,
    },
}

impl TryFrom<RawEntry> for FavoriteEntry {
    type Error = &'static str;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        match raw {
            RawEntry::Id(id) => Ok(FavoriteEntry::Id(id)),
            RawEntry::Record { id, mongo_id } => id
                .or(mongo_id)
                .map(|id| FavoriteEntry::Record { id })
                .ok_or("favorite record has no id"),
        }
    }
}

impl FavoriteEntry {
    pub fn spot_id(&self) -> &SpotId {
        match self {
            FavoriteEntry::Id(id) | FavoriteEntry::Record { id } => id,
        }
    }
}

/// Decode a favorites list into unique ids, keeping first-seen order.
pub fn decode_favorite_ids(values: Vec<Value>) -> Vec<SpotId> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<FavoriteEntry>(value) {
            Ok(entry) => Some(entry.spot_id().clone()),
            Err(e) => {
                tracing::debug!(error = %e, "Dropping malformed favorite entry");
                None
            }
        })
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
