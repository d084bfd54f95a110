//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::AppState;
use super::types::{ErrorResponse, EventResponse, SimulateQuery};
use crate::catalog::Catalog;
use crate::sim::DayReport;
use crate::system::{CompatibilityCheck, Event, SystemState, compatibility};

/// `GET /state` → 200 + `SystemState` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<SystemState> {
    Json(state.lock().clone())
}

/// Applies one event to the shared state.
///
/// `POST /events` → 200 + `EventResponse` JSON
/// Unknown catalog reference → 422 + `ErrorResponse`, state unchanged
pub async fn post_event(
    State(state): State<Arc<AppState>>,
    Json(event): Json<Event>,
) -> Result<Json<EventResponse>, (StatusCode, Json<ErrorResponse>)> {
    let mut system = state.lock();
    match system.apply(event, &state.catalog) {
        Ok((next, output)) => {
            *system = next.clone();
            Ok(Json(EventResponse {
                output,
                state: next,
            }))
        }
        Err(e) => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// `GET /compatibility` → 200 + `Vec<CompatibilityCheck>` JSON
pub async fn get_compatibility(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<CompatibilityCheck>> {
    let system = state.lock();
    Json(compatibility(&system, &state.catalog))
}

/// Simulates a day with the current system.
///
/// `POST /simulate` → 200 + `DayReport` JSON
/// `POST /simulate?seed=N` → reproducible day
pub async fn post_simulate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SimulateQuery>,
) -> Json<DayReport> {
    let system = state.lock().clone();
    let report = match query.seed {
        Some(seed) => system.simulate(&mut StdRng::seed_from_u64(seed)),
        None => system.simulate(&mut rand::rng()),
    };
    Json(report)
}

/// `GET /catalog` → 200 + `Catalog` JSON
pub async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<Catalog> {
    Json(state.catalog.clone())
}
