// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process HTTP stand-in for the spot store.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub const TOKEN: &str = "test_token";

#[derive(Default)]
pub struct StubState {
    pub spots: Mutex<Vec<Value>>,
    pub favorites: Mutex<Vec<Value>>,
    pub added_spots: Mutex<Vec<String>>,
    /// Every request seen, as "METHOD /path".
    pub requests: Mutex<Vec<String>>,
    /// When set, every request answers with this status.
    pub force_status: Mutex<Option<StatusCode>>,
    /// When set, create and update answer with a message instead of the record.
    pub ack_only: Mutex<bool>,
}

impl StubState {
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serve the stub on an ephemeral local port; returns its base URL.
pub async fn spawn(state: Arc<StubState>) -> String {
    let app = Router::new()
        .route("/workout-spots", get(list_spots).post(create_spot))
        .route("/workout-spots/by-ids", post(spots_by_ids))
        .route("/workout-spots/{id}", put(update_spot).delete(delete_spot))
        .route("/favorites", get(list_favorites))
        .route(
            "/favorites/{id}",
            post(add_favorite).delete(remove_favorite),
        )
        .route("/profile", get(profile))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

type Reply = Result<Json<Value>, (StatusCode, String)>;

fn record(state: &StubState, headers: &HeaderMap, line: String) -> Result<(), (StatusCode, String)> {
    state.requests.lock().unwrap().push(line);
    if let Some(status) = *state.force_status.lock().unwrap() {
        return Err((status, "forced".to_string()));
    }
    let authorized = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .is_some_and(|h| h == format!("Bearer {}", TOKEN));
    if !authorized {
        return Err((StatusCode::UNAUTHORIZED, "missing token".to_string()));
    }
    Ok(())
}

fn spot_id(spot: &Value) -> Option<&str> {
    spot.get("_id")
        .or_else(|| spot.get("id"))
        .and_then(Value::as_str)
}

async fn list_spots(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Reply {
    record(&state, &headers, "GET /workout-spots".to_string())?;
    Ok(Json(Value::Array(state.spots.lock().unwrap().clone())))
}

async fn spots_by_ids(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    record(&state, &headers, "POST /workout-spots/by-ids".to_string())?;
    let ids: Vec<String> = serde_json::from_value(body["ids"].clone())
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    let spots = state.spots.lock().unwrap();
    let found: Vec<Value> = spots
        .iter()
        .filter(|s| spot_id(s).is_some_and(|id| ids.iter().any(|i| i == id)))
        .cloned()
        .collect();
    Ok(Json(Value::Array(found)))
}

async fn create_spot(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    record(&state, &headers, "POST /workout-spots".to_string())?;
    let mut spots = state.spots.lock().unwrap();
    let mut created = body.clone();
    created["_id"] = json!(format!("created-{}", spots.len() + 1));
    created["ownerEmail"] = json!("me@example.com");
    spots.push(created.clone());
    if *state.ack_only.lock().unwrap() {
        return Ok(Json(json!({"message": "Spot created"})));
    }
    Ok(Json(created))
}

async fn update_spot(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    record(&state, &headers, format!("PUT /workout-spots/{}", id))?;
    let mut spots = state.spots.lock().unwrap();
    let spot = spots
        .iter_mut()
        .find(|s| spot_id(s) == Some(id.as_str()))
        .ok_or((StatusCode::NOT_FOUND, "Spot not found".to_string()))?;
    if spot["ownerEmail"] != "me@example.com" {
        return Err((StatusCode::FORBIDDEN, "Not your spot".to_string()));
    }
    for key in ["description", "type"] {
        if let Some(v) = body.get(key) {
            spot[key] = v.clone();
        }
    }
    if *state.ack_only.lock().unwrap() {
        return Ok(Json(json!({"message": "Spot updated"})));
    }
    Ok(Json(spot.clone()))
}

async fn delete_spot(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    record(&state, &headers, format!("DELETE /workout-spots/{}", id))?;
    let mut spots = state.spots.lock().unwrap();
    let before = spots.len();
    spots.retain(|s| spot_id(s) != Some(id.as_str()));
    if spots.len() == before {
        return Err((StatusCode::NOT_FOUND, "Spot not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_favorites(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Reply {
    record(&state, &headers, "GET /favorites".to_string())?;
    Ok(Json(Value::Array(state.favorites.lock().unwrap().clone())))
}

async fn add_favorite(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    record(&state, &headers, format!("POST /favorites/{}", id))?;
    let mut favorites = state.favorites.lock().unwrap();
    if favorites.iter().any(|f| f == &json!(id)) {
        return Err((StatusCode::CONFLICT, "Already in favorites".to_string()));
    }
    favorites.push(json!(id));
    Ok(StatusCode::CREATED)
}

async fn remove_favorite(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    record(&state, &headers, format!("DELETE /favorites/{}", id))?;
    let mut favorites = state.favorites.lock().unwrap();
    let before = favorites.len();
    favorites.retain(|f| f != &json!(id));
    if favorites.len() == before {
        return Err((StatusCode::NOT_FOUND, "Not in favorites".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn profile(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Reply {
    record(&state, &headers, "GET /profile".to_string())?;
    Ok(Json(json!({
        "email": "me@example.com",
        "added_spots": state.added_spots.lock().unwrap().clone(),
    })))
}
