// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! View reconciler: keeps the displayed projection consistent with the
//! spot store and the favorites ledger across concurrent user actions.
//!
//! Handles:
//! - Loading a view (nearby, owned, favorites) with last-load-wins ordering
//! - Per-spot pending guards so each spot has at most one mutation in flight
//! - Applying mutation results without a full favorites round-trip
//! - Replaying mutations that finish while a load is in flight

use crate::config::Config;
use crate::error::{Result, SpotError};
use crate::models::{
    Coordinate, LoadState, NewSpot, PendingOp, SpotId, SpotUpdate, View, ViewProjection,
    WorkoutSpot,
};
use crate::services::api::ApiClient;
use crate::services::favorites::{FavoriteStore, FavoritesLedger};
use crate::services::proximity;
use crate::services::spots::{SpotRepository, SpotStore};
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::Mutex;

/// What an operation did to the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The store reported the spot as already deleted; treated as success.
    AlreadyGone,
    /// Guarded no-op, nothing was sent to the store.
    Skipped(SkipReason),
    /// A newer load started before this one finished; its result was dropped.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Pending(PendingOp),
    AlreadyFavorite,
    NotFavorite,
    NothingLoaded,
}

/// A mutation result that has been applied to the projection.
#[derive(Debug, Clone)]
enum Change {
    Deleted(SpotId),
    Favorited(SpotId),
    Unfavorited(SpotId),
}

/// Result of the remote half of a load.
struct Fetched {
    spots: Vec<WorkoutSpot>,
    favorites: BTreeSet<SpotId>,
}

#[derive(Default)]
struct State {
    projection: ViewProjection,
    /// Bumped by every load; only the latest load may apply its result.
    generation: u64,
    /// Changes applied while the latest load is in flight. Its result was
    /// read before these landed, so they are replayed on top of it.
    journal: Vec<Change>,
}

impl State {
    fn skip_reason(&self, id: &SpotId, op: PendingOp) -> Option<SkipReason> {
        if let Some(current) = self.projection.pending_op(id) {
            return Some(SkipReason::Pending(current));
        }
        match op {
            PendingOp::AddFavorite if self.projection.is_favorite(id) => {
                Some(SkipReason::AlreadyFavorite)
            }
            PendingOp::RemoveFavorite if !self.projection.is_favorite(id) => {
                Some(SkipReason::NotFavorite)
            }
            _ => None,
        }
    }

    /// Mark `id` pending unless a guard says otherwise.
    fn begin(&mut self, id: &SpotId, op: PendingOp) -> Option<SkipReason> {
        if let Some(reason) = self.skip_reason(id, op) {
            tracing::debug!(spot_id = %id, ?op, ?reason, "Skipping mutation");
            return Some(reason);
        }
        self.projection.pending.insert(id.clone(), op);
        None
    }

    fn finish(&mut self, id: &SpotId) {
        if self.projection.pending.remove(id).is_none() {
            tracing::error!(spot_id = %id, "Pending flag already cleared");
        }
    }

    fn record(&mut self, change: Change) {
        apply_change(&mut self.projection, &change);
        if self.projection.load_state == LoadState::Loading {
            self.journal.push(change);
        }
    }
}

fn apply_change(projection: &mut ViewProjection, change: &Change) {
    match change {
        Change::Deleted(id) => {
            projection.spots.retain(|s| &s.id != id);
            projection.favorites.remove(id);
        }
        Change::Favorited(id) => {
            projection.favorites.insert(id.clone());
        }
        Change::Unfavorited(id) => {
            projection.favorites.remove(id);
            if projection.view == Some(View::Favorites) {
                projection.spots.retain(|s| &s.id != id);
            }
        }
    }
}

/// Favorite ids that still point at a known spot. The rest are dangling.
fn retain_existing(favorites: Vec<SpotId>, spots: &[WorkoutSpot]) -> BTreeSet<SpotId> {
    let known: BTreeSet<&SpotId> = spots.iter().map(|s| &s.id).collect();
    let total = favorites.len();
    let kept: BTreeSet<SpotId> = favorites
        .into_iter()
        .filter(|id| known.contains(id))
        .collect();
    if kept.len() < total {
        tracing::debug!(dropped = total - kept.len(), "Dropping dangling favorites");
    }
    kept
}

/// One reconciler per screen instance.
pub struct Reconciler<S, F> {
    spots: S,
    favorites: F,
    state: Mutex<State>,
}

impl Reconciler<SpotRepository, FavoritesLedger> {
    /// Reconciler backed by the HTTP store described in `config`.
    pub fn connect(config: &Config) -> Result<Self> {
        let api = ApiClient::from_config(config)?;
        Ok(Self::new(
            SpotRepository::new(api.clone()),
            FavoritesLedger::new(api),
        ))
    }
}

impl<S: SpotStore, F: FavoriteStore> Reconciler<S, F> {
    pub fn new(spots: S, favorites: F) -> Self {
        Self {
            spots,
            favorites,
            state: Mutex::new(State::default()),
        }
    }

    /// Copy of the current projection for the presentation layer.
    pub async fn snapshot(&self) -> ViewProjection {
        self.state.lock().await.projection.clone()
    }

    // ─── Loads ───────────────────────────────────────────────────────────────

    /// Show spots within `radius_km` of `reference`.
    pub async fn load_nearby(&self, reference: Coordinate, radius_km: f64) -> Result<Outcome> {
        reference.validate()?;
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(SpotError::Invalid(format!("invalid radius: {}", radius_km)));
        }
        self.load(View::Nearby {
            reference,
            radius_km,
        })
        .await
    }

    /// Show spots created by the current user.
    pub async fn load_owned(&self) -> Result<Outcome> {
        self.load(View::Owned).await
    }

    /// Show the current user's favorite spots, in ledger order.
    pub async fn load_favorites(&self) -> Result<Outcome> {
        self.load(View::Favorites).await
    }

    /// Re-run the last load.
    pub async fn refresh(&self) -> Result<Outcome> {
        let view = self.state.lock().await.projection.view;
        match view {
            Some(view) => self.load(view).await,
            None => Ok(Outcome::Skipped(SkipReason::NothingLoaded)),
        }
    }

    async fn load(&self, view: View) -> Result<Outcome> {
        let generation = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.journal.clear();
            state.projection.load_state = LoadState::Loading;
            state.projection.view = Some(view);
            state.generation
        };

        let fetched = self.fetch(view).await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            tracing::debug!(
                generation,
                latest = state.generation,
                "Discarding superseded load"
            );
            return Ok(Outcome::Superseded);
        }

        let State {
            projection,
            journal,
            ..
        } = &mut *state;
        let replay = std::mem::take(journal);

        match fetched {
            Ok(Fetched { spots, favorites }) => {
                projection.spots = spots;
                projection.favorites = favorites;
                for change in &replay {
                    apply_change(projection, change);
                }
                projection.load_state = LoadState::Loaded;
                projection.loaded_at = Some(Utc::now());
                tracing::info!(
                    ?view,
                    spots = projection.spots.len(),
                    favorites = projection.favorites.len(),
                    "View loaded"
                );
                Ok(Outcome::Completed)
            }
            Err(e) => {
                // Never show a possibly stale list; favorites keep their last value.
                projection.spots.clear();
                projection.load_state = LoadState::Failed;
                tracing::warn!(?view, error = %e, "View load failed");
                Err(e)
            }
        }
    }

    async fn fetch(&self, view: View) -> Result<Fetched> {
        match view {
            View::Nearby {
                reference,
                radius_km,
            } => {
                let (all, favorites) = tokio::join!(self.spots.list_all(), self.favorite_ids());
                let all = all?;
                Ok(Fetched {
                    favorites: retain_existing(favorites, &all),
                    spots: proximity::within(reference, radius_km, &all),
                })
            }
            View::Owned => {
                let (owned, favorites) =
                    tokio::join!(self.spots.list_owned(), self.favorite_ids());
                let owned = owned?;
                Ok(Fetched {
                    favorites: retain_existing(favorites, &owned),
                    spots: owned,
                })
            }
            View::Favorites => {
                let ids = self.favorite_ids().await;
                let mut by_id: HashMap<SpotId, WorkoutSpot> = self
                    .spots
                    .list_by_ids(&ids)
                    .await?
                    .into_iter()
                    .map(|s| (s.id.clone(), s))
                    .collect();

                let spots: Vec<WorkoutSpot> =
                    ids.iter().filter_map(|id| by_id.remove(id)).collect();
                if spots.len() < ids.len() {
                    tracing::debug!(
                        dropped = ids.len() - spots.len(),
                        "Dropping dangling favorites"
                    );
                }
                Ok(Fetched {
                    favorites: spots.iter().map(|s| s.id.clone()).collect(),
                    spots,
                })
            }
        }
    }

    /// Favorites list, with any failure read as "no favorites".
    async fn favorite_ids(&self) -> Vec<SpotId> {
        match self.favorites.list().await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(error = %e, "Favorites unavailable, showing none");
                Vec::new()
            }
        }
    }

    // ─── Per-spot mutations ──────────────────────────────────────────────────

    /// Add `id` to the user's favorites.
    pub async fn toggle_favorite(&self, id: &SpotId) -> Result<Outcome> {
        if let Some(reason) = self.state.lock().await.begin(id, PendingOp::AddFavorite) {
            return Ok(Outcome::Skipped(reason));
        }

        let result = self.favorites.add(id).await;

        let mut state = self.state.lock().await;
        state.finish(id);
        match result {
            Ok(()) => {
                state.record(Change::Favorited(id.clone()));
                Ok(Outcome::Completed)
            }
            Err(e) => {
                tracing::warn!(spot_id = %id, error = %e, "Adding favorite failed");
                Err(e)
            }
        }
    }

    /// Remove `id` from the user's favorites.
    pub async fn remove_favorite(&self, id: &SpotId) -> Result<Outcome> {
        if let Some(reason) = self
            .state
            .lock()
            .await
            .begin(id, PendingOp::RemoveFavorite)
        {
            return Ok(Outcome::Skipped(reason));
        }

        let result = self.favorites.remove(id).await;

        let mut state = self.state.lock().await;
        state.finish(id);
        match result {
            Ok(()) => {
                state.record(Change::Unfavorited(id.clone()));
                Ok(Outcome::Completed)
            }
            Err(e) => {
                tracing::warn!(spot_id = %id, error = %e, "Removing favorite failed");
                Err(e)
            }
        }
    }

    /// Delete a spot the user owns.
    pub async fn delete_owned(&self, id: &SpotId) -> Result<Outcome> {
        if let Some(reason) = self.state.lock().await.begin(id, PendingOp::Delete) {
            return Ok(Outcome::Skipped(reason));
        }

        let result = self.spots.delete(id).await;

        let mut state = self.state.lock().await;
        state.finish(id);
        match result {
            Ok(()) => {
                state.record(Change::Deleted(id.clone()));
                Ok(Outcome::Completed)
            }
            Err(SpotError::NotFound(_)) => {
                tracing::info!(spot_id = %id, "Spot already deleted");
                state.record(Change::Deleted(id.clone()));
                Ok(Outcome::AlreadyGone)
            }
            Err(e) => {
                tracing::warn!(spot_id = %id, error = %e, "Deleting spot failed");
                Err(e)
            }
        }
    }

    /// Edit a spot the user owns, then reload the current view from the store.
    ///
    /// Returns the updated record as echoed by the store, or else as found
    /// by the reload; `None` if neither has it. A failed reload leaves the
    /// projection `Failed`; the edit itself has still been applied and is
    /// reported as such.
    pub async fn edit_owned(
        &self,
        id: &SpotId,
        fields: &SpotUpdate,
    ) -> Result<Option<WorkoutSpot>> {
        let echoed = self.spots.update(id, fields).await.map_err(|e| {
            tracing::warn!(spot_id = %id, error = %e, "Editing spot failed");
            e
        })?;

        if let Err(e) = self.refresh().await {
            tracing::warn!(spot_id = %id, error = %e, "Reload after edit failed");
        }
        match echoed {
            Some(updated) => Ok(Some(updated)),
            None => Ok(self.state.lock().await.projection.get(id).cloned()),
        }
    }

    /// Create a spot, then reload the current view from the store.
    ///
    /// Returns the created record when the store echoes it back.
    pub async fn create_spot(&self, spot: &NewSpot) -> Result<Option<WorkoutSpot>> {
        let created = self.spots.create(spot).await.map_err(|e| {
            tracing::warn!(error = %e, "Creating spot failed");
            e
        })?;

        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "Reload after create failed");
        }
        Ok(created)
    }
}
