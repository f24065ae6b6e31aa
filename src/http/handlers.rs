use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::booking::{self, SeatLockOutcome};
use crate::error::CarpoolError;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::matching::{self, CityPairQuery, MatchOutcome, MatchedDriver, PassengerRequest};
use crate::registry::{DriverOffer, DriverOfferInput};

#[derive(Debug, Serialize)]
pub struct DriversResponse {
    pub drivers: Vec<DriverOffer>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub driver_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LocationUpdate {
    pub lat: f64,
    pub lon: f64,
}

fn default_seats() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct SeatLockRequest {
    /// Signed so a negative count reports the field instead of failing to decode.
    #[serde(default = "default_seats")]
    pub seats: i64,
}

/// `{"matched": true, "drivers": [...]}` or `{"matched": false, "reason": ...}`.
#[derive(Debug, Serialize)]
pub struct ProximityResponse {
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drivers: Option<Vec<MatchedDriver>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

impl From<MatchOutcome> for ProximityResponse {
    fn from(outcome: MatchOutcome) -> Self {
        match outcome {
            MatchOutcome::Matched(drivers) => Self {
                matched: true,
                drivers: Some(drivers),
                reason: None,
            },
            MatchOutcome::NoMatch(reason) => Self {
                matched: false,
                drivers: None,
                reason: Some(reason.as_str()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CityPairResponse {
    pub rides: Vec<DriverOffer>,
}

/// Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}

/// `GET /drivers`: every live offer in registration order.
pub async fn list_drivers(State(state): State<AppState>) -> Json<DriversResponse> {
    Json(DriversResponse {
        drivers: state.registry.snapshot(),
    })
}

/// `POST /drivers`: register an offer, then persist the snapshot.
pub async fn register_driver(
    State(state): State<AppState>,
    payload: Result<Json<DriverOfferInput>, JsonRejection>,
) -> Result<(StatusCode, Json<StatusResponse>), ApiError> {
    let Json(input) = payload?;
    let driver_id = state.registry.register(input)?;
    state.persist_after_mutation().await;

    Ok((
        StatusCode::CREATED,
        Json(StatusResponse {
            status: "registered",
            driver_id,
        }),
    ))
}

/// `PUT /drivers/{id}/location`: move a driver, then persist the snapshot.
pub async fn update_location(
    State(state): State<AppState>,
    Path(driver_id): Path<String>,
    payload: Result<Json<LocationUpdate>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(update) = payload?;
    state
        .registry
        .update_location(&driver_id, update.lat, update.lon)?;
    state.persist_after_mutation().await;

    Ok(Json(StatusResponse {
        status: "updated",
        driver_id,
    }))
}

/// `DELETE /drivers/{id}`: withdraw an offer, then persist the snapshot.
pub async fn remove_driver(
    State(state): State<AppState>,
    Path(driver_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.registry.remove(&driver_id)?;
    state.persist_after_mutation().await;

    Ok(Json(StatusResponse {
        status: "removed",
        driver_id,
    }))
}

/// `POST /drivers/{id}/seats/lock`: decrement seats, then persist on the blocking pool.
pub async fn lock_seats(
    State(state): State<AppState>,
    Path(driver_id): Path<String>,
    payload: Result<Json<SeatLockRequest>, JsonRejection>,
) -> Result<Json<SeatLockOutcome>, ApiError> {
    let Json(request) = payload?;
    let seats = CarpoolError::positive_count("seats", request.seats)?;
    let registry = state.registry.clone();
    let store = state.write_through_store();

    let outcome = tokio::task::spawn_blocking(move || {
        booking::lock_seats(&registry, store.as_deref(), &driver_id, seats)
    })
    .await??;
    Ok(Json(outcome))
}

/// `POST /matches/proximity`: rank nearby offers for a passenger.
pub async fn find_by_proximity(
    State(state): State<AppState>,
    payload: Result<Json<PassengerRequest>, JsonRejection>,
) -> Result<Json<ProximityResponse>, ApiError> {
    let Json(request) = payload?;
    let snapshot = state.registry.snapshot();
    let outcome = matching::find_by_proximity(&snapshot, &request, &state.matching)?;
    Ok(Json(outcome.into()))
}

/// `POST /matches/city-pair`: offers between two named cities; logs the query.
pub async fn find_by_city_pair(
    State(state): State<AppState>,
    payload: Result<Json<CityPairQuery>, JsonRejection>,
) -> Result<Json<CityPairResponse>, ApiError> {
    let Json(query) = payload?;
    let registry = state.registry.clone();
    let history = Arc::clone(&state.history);

    // The history append is file I/O.
    let rides = tokio::task::spawn_blocking(move || {
        let snapshot = registry.snapshot();
        matching::find_by_city_pair(&snapshot, &query, history.as_ref())
    })
    .await??;
    Ok(Json(CityPairResponse { rides }))
}
