// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod coordinate;
pub mod favorite;
pub mod projection;
pub mod spot;

pub use coordinate::Coordinate;
pub use favorite::FavoriteEntry;
pub use projection::{LoadState, PendingOp, View, ViewProjection};
pub use spot::{Category, NewSpot, SpotId, SpotUpdate, WorkoutSpot};
