// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - store clients and view reconciliation.

pub mod api;
pub mod favorites;
pub mod proximity;
pub mod reconciler;
pub mod spots;

pub use api::ApiClient;
pub use favorites::{FavoriteStore, FavoritesLedger};
pub use reconciler::{Outcome, Reconciler, SkipReason};
pub use spots::{SpotRepository, SpotStore};
