// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Radius selection over candidate spots.

use crate::geodesy::distance_km;
use crate::models::{Coordinate, WorkoutSpot};

/// Radius of the "nearby spots" view.
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 10.0;

/// Spots within `radius_km` of `reference`, boundary inclusive, in input order.
pub fn within(
    reference: Coordinate,
    radius_km: f64,
    candidates: &[WorkoutSpot],
) -> Vec<WorkoutSpot> {
    candidates
        .iter()
        .filter(|spot| is_within(reference, radius_km, spot))
        .cloned()
        .collect()
}

/// Whether a single spot falls inside the radius.
pub fn is_within(reference: Coordinate, radius_km: f64, spot: &WorkoutSpot) -> bool {
    distance_km(reference, spot.coordinate()) <= radius_km
}
