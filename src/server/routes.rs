//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::error::Error;
use crate::geo::{Candidate, DeviceLocator, GeocodingClient};
use crate::map::headless::MapView;
use crate::map::MapEvent;
use crate::picker::search::SearchResults;
use crate::picker::selection::{LocationSnapshot, SelectionPhase};
use crate::server::state::AppState;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

type SharedState<G, D> = State<Arc<AppState<G, D>>>;

/// Create the API router
pub fn create_router<G, D>(state: Arc<AppState<G, D>>) -> Router
where
    G: GeocodingClient + 'static,
    D: DeviceLocator + 'static,
{
    Router::new()
        .route("/api/status", get(status_handler::<G, D>))
        .route(
            "/api/location",
            get(get_location_handler::<G, D>)
                .put(set_location_handler::<G, D>)
                .delete(clear_location_handler::<G, D>),
        )
        .route("/api/locate", post(locate_handler::<G, D>))
        .route("/api/map", get(map_handler::<G, D>))
        .route("/api/map/events", post(map_event_handler::<G, D>))
        .route(
            "/api/search",
            get(search_results_handler::<G, D>).post(search_input_handler::<G, D>),
        )
        .route("/api/search/select", post(select_handler::<G, D>))
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip)]
    status: StatusCode,
}

impl ApiError {
    fn search_disabled() -> Self {
        ApiError {
            error: "Search is disabled".to_string(),
            code: "SEARCH_DISABLED".to_string(),
            status: StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (status, code) = match &err {
            Error::InvalidCoordinate(_) => (StatusCode::BAD_REQUEST, "INVALID_COORDINATE"),
            Error::LocationUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "LOCATION_UNAVAILABLE")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
            status,
        }
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Selection phase
    pub phase: SelectionPhase,
    /// Whether the search box is available
    pub search_enabled: bool,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler<G, D>(State(state): SharedState<G, D>) -> Json<StatusResponse>
where
    G: GeocodingClient + 'static,
    D: DeviceLocator + 'static,
{
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        phase: state.controller.phase(),
        search_enabled: state.controller.search().is_some(),
    })
}

/// Read the bound fields
///
/// GET /api/location
async fn get_location_handler<G, D>(State(state): SharedState<G, D>) -> Json<LocationSnapshot>
where
    G: GeocodingClient + 'static,
    D: DeviceLocator + 'static,
{
    Json(state.controller.get_location())
}

/// Set location request body
#[derive(Debug, Deserialize)]
pub struct SetLocationRequest {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub address: Option<String>,
}

/// Select a location
///
/// PUT /api/location
async fn set_location_handler<G, D>(
    State(state): SharedState<G, D>,
    Json(req): Json<SetLocationRequest>,
) -> Result<Json<LocationSnapshot>, ApiError>
where
    G: GeocodingClient + 'static,
    D: DeviceLocator + 'static,
{
    state
        .controller
        .set_location(req.lat, req.lng, req.address.as_deref())?;
    Ok(Json(state.controller.get_location()))
}

/// Clear the selection
///
/// DELETE /api/location
async fn clear_location_handler<G, D>(State(state): SharedState<G, D>) -> StatusCode
where
    G: GeocodingClient + 'static,
    D: DeviceLocator + 'static,
{
    state.controller.clear_location();
    StatusCode::NO_CONTENT
}

/// Select the device location
///
/// POST /api/locate
async fn locate_handler<G, D>(
    State(state): SharedState<G, D>,
) -> Result<Json<LocationSnapshot>, ApiError>
where
    G: GeocodingClient + 'static,
    D: DeviceLocator + 'static,
{
    state.controller.request_current_device_location().await?;
    Ok(Json(state.controller.get_location()))
}

/// Current map view
///
/// GET /api/map
async fn map_handler<G, D>(State(state): SharedState<G, D>) -> Json<MapView>
where
    G: GeocodingClient + 'static,
    D: DeviceLocator + 'static,
{
    Json(state.controller.map().view())
}

/// Forward a map interaction (click, marker drag, locate button)
///
/// POST /api/map/events
async fn map_event_handler<G, D>(
    State(state): SharedState<G, D>,
    Json(event): Json<MapEvent>,
) -> Result<Json<LocationSnapshot>, ApiError>
where
    G: GeocodingClient + 'static,
    D: DeviceLocator + 'static,
{
    state.controller.handle_map_event(event).await?;
    Ok(Json(state.controller.get_location()))
}

/// Search state response
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub input: String,
    pub results: SearchResults,
}

/// Current search box contents
///
/// GET /api/search
async fn search_results_handler<G, D>(
    State(state): SharedState<G, D>,
) -> Result<Json<SearchResponse>, ApiError>
where
    G: GeocodingClient + 'static,
    D: DeviceLocator + 'static,
{
    let search = state.controller.search().ok_or_else(ApiError::search_disabled)?;
    Ok(Json(SearchResponse {
        input: search.input(),
        results: search.results(),
    }))
}

/// Search input request body
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub text: String,
}

/// Search input response
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchAccepted {
    /// Sequence number of the issued query, None if the input was too short
    pub seq: Option<u64>,
}

/// Type into the search box
///
/// POST /api/search
///
/// Results arrive asynchronously; poll GET /api/search.
async fn search_input_handler<G, D>(
    State(state): SharedState<G, D>,
    Json(req): Json<SearchRequest>,
) -> Result<(StatusCode, Json<SearchAccepted>), ApiError>
where
    G: GeocodingClient + 'static,
    D: DeviceLocator + 'static,
{
    if state.controller.search().is_none() {
        return Err(ApiError::search_disabled());
    }
    let seq = state.controller.search_input(&req.text)?.map(|task| task.seq());
    Ok((StatusCode::ACCEPTED, Json(SearchAccepted { seq })))
}

/// Pick a search candidate
///
/// POST /api/search/select
async fn select_handler<G, D>(
    State(state): SharedState<G, D>,
    Json(candidate): Json<Candidate>,
) -> Result<Json<LocationSnapshot>, ApiError>
where
    G: GeocodingClient + 'static,
    D: DeviceLocator + 'static,
{
    state.controller.select_candidate(&candidate)?;
    Ok(Json(state.controller.get_location()))
}
