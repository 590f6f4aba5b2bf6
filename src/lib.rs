// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! HealthMate spots: geospatial directory and sync engine for workout spots.
//!
//! This crate filters geotagged workout spots by distance from a reference
//! point and keeps an in-memory view of spots, favorites and in-flight
//! mutations consistent with the remote spot store.

pub mod config;
pub mod error;
pub mod geodesy;
pub mod models;
pub mod services;

pub use error::{Result, SpotError};
pub use services::{Outcome, Reconciler, SkipReason};
