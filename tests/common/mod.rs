// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

#![allow(dead_code)]

pub mod stub;

use async_trait::async_trait;
use healthmate_spots::models::{Category, Coordinate, NewSpot, SpotId, SpotUpdate, WorkoutSpot};
use healthmate_spots::services::{FavoriteStore, SpotStore};
use healthmate_spots::{Reconciler, Result, SpotError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const ME: &str = "me@example.com";
pub const SOMEONE_ELSE: &str = "other@example.com";

pub const BANGKOK: Coordinate = Coordinate::new(13.7563, 100.5018);

/// Spot owned by the test user.
pub fn spot(id: &str, latitude: f64, longitude: f64) -> WorkoutSpot {
    WorkoutSpot::new(id, Coordinate::new(latitude, longitude), Category::Running).with_owner(ME)
}

/// Pauses one call of a fake store operation until the test releases it.
#[derive(Default)]
pub struct Gate {
    entered: Notify,
    release: Notify,
}

impl Gate {
    /// Wait until the gated call is in flight.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

#[derive(Default)]
struct Remote {
    spots: Vec<WorkoutSpot>,
    favorites: Vec<SpotId>,
    next_id: u32,
}

#[derive(Default)]
struct Inner {
    remote: Mutex<Remote>,
    gates: Mutex<HashMap<&'static str, Arc<Gate>>>,
    failures: Mutex<HashMap<&'static str, SpotError>>,
    calls: Mutex<Vec<&'static str>>,
}

/// In-memory spot store and favorites ledger with the store's semantics:
/// owner checks, cascade of favorites on delete, idempotent favorites.
#[derive(Clone, Default)]
pub struct FakeStore {
    inner: Arc<Inner>,
}

impl FakeStore {
    pub fn with_spots(spots: Vec<WorkoutSpot>) -> Self {
        let store = Self::default();
        store.inner.remote.lock().unwrap().spots = spots;
        store
    }

    pub fn reconciler(&self) -> Reconciler<FakeStore, FakeStore> {
        Reconciler::new(self.clone(), self.clone())
    }

    pub fn set_favorites(&self, ids: &[&str]) {
        self.inner.remote.lock().unwrap().favorites = ids.iter().map(|id| (*id).into()).collect();
    }

    pub fn favorites(&self) -> Vec<SpotId> {
        self.inner.remote.lock().unwrap().favorites.clone()
    }

    pub fn spot_ids(&self) -> Vec<SpotId> {
        self.inner
            .remote
            .lock()
            .unwrap()
            .spots
            .iter()
            .map(|s| s.id.clone())
            .collect()
    }

    pub fn push_spot(&self, spot: WorkoutSpot) {
        self.inner.remote.lock().unwrap().spots.push(spot);
    }

    pub fn remove_spot(&self, id: &str) {
        self.inner
            .remote
            .lock()
            .unwrap()
            .spots
            .retain(|s| s.id.as_str() != id);
    }

    /// Hold the next call of `op` until the returned gate is released.
    pub fn gate(&self, op: &'static str) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        self.inner.gates.lock().unwrap().insert(op, gate.clone());
        gate
    }

    /// Make the next call of `op` fail with `err`.
    pub fn fail_next(&self, op: &'static str, err: SpotError) {
        self.inner.failures.lock().unwrap().insert(op, err);
    }

    pub fn calls(&self, op: &str) -> usize {
        self.inner
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == op)
            .count()
    }

    async fn enter(&self, op: &'static str) -> Result<()> {
        self.inner.calls.lock().unwrap().push(op);
        let gate = self.inner.gates.lock().unwrap().remove(op);
        if let Some(gate) = gate {
            gate.pass().await;
        }
        match self.inner.failures.lock().unwrap().remove(op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SpotStore for FakeStore {
    async fn list_all(&self) -> Result<Vec<WorkoutSpot>> {
        // Read before the gate so a held call returns what was true when it
        // was issued, like a response still in transit.
        let spots = self.inner.remote.lock().unwrap().spots.clone();
        self.enter("list_all").await?;
        Ok(spots)
    }

    async fn list_by_ids(&self, ids: &[SpotId]) -> Result<Vec<WorkoutSpot>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.enter("list_by_ids").await?;
        let remote = self.inner.remote.lock().unwrap();
        Ok(remote
            .spots
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn list_owned(&self) -> Result<Vec<WorkoutSpot>> {
        self.enter("list_owned").await?;
        let remote = self.inner.remote.lock().unwrap();
        Ok(remote
            .spots
            .iter()
            .filter(|s| s.owner() == Some(ME))
            .cloned()
            .collect())
    }

    async fn create(&self, spot: &NewSpot) -> Result<Option<WorkoutSpot>> {
        spot.check()?;
        self.enter("create").await?;
        let mut remote = self.inner.remote.lock().unwrap();
        remote.next_id += 1;
        let mut created = WorkoutSpot::new(
            format!("new-{}", remote.next_id),
            Coordinate::new(spot.latitude, spot.longitude),
            spot.category,
        )
        .with_owner(ME);
        created.description = spot.description.clone();
        remote.spots.push(created.clone());
        Ok(Some(created))
    }

    async fn update(&self, id: &SpotId, fields: &SpotUpdate) -> Result<Option<WorkoutSpot>> {
        fields.check()?;
        self.enter("update").await?;
        let mut remote = self.inner.remote.lock().unwrap();
        let spot = remote
            .spots
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| SpotError::NotFound(id.to_string()))?;
        if spot.owner() != Some(ME) {
            return Err(SpotError::Forbidden(id.to_string()));
        }
        if let Some(description) = &fields.description {
            spot.description = Some(description.clone());
        }
        if let Some(category) = fields.category {
            spot.category = category;
        }
        Ok(Some(spot.clone()))
    }

    async fn delete(&self, id: &SpotId) -> Result<()> {
        self.enter("delete").await?;
        let mut remote = self.inner.remote.lock().unwrap();
        let spot = remote
            .spots
            .iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| SpotError::NotFound(id.to_string()))?;
        if spot.owner() != Some(ME) {
            return Err(SpotError::Forbidden(id.to_string()));
        }
        remote.spots.retain(|s| &s.id != id);
        remote.favorites.retain(|f| f != id);
        Ok(())
    }
}

#[async_trait]
impl FavoriteStore for FakeStore {
    async fn list(&self) -> Result<Vec<SpotId>> {
        self.enter("favorites_list").await?;
        Ok(self.inner.remote.lock().unwrap().favorites.clone())
    }

    async fn add(&self, id: &SpotId) -> Result<()> {
        self.enter("favorites_add").await?;
        let mut remote = self.inner.remote.lock().unwrap();
        if !remote.favorites.contains(id) {
            remote.favorites.push(id.clone());
        }
        Ok(())
    }

    async fn remove(&self, id: &SpotId) -> Result<()> {
        self.enter("favorites_remove").await?;
        self.inner
            .remote
            .lock()
            .unwrap()
            .favorites
            .retain(|f| f != id);
        Ok(())
    }
}
