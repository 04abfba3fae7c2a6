//! Nearby-hospital search.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use carepoint_triage::hospital::search_term;
use tracing::info;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::extract::ValidatedJson;
use crate::schemas::hospital::{Hospital, LatLng, NearbyHospitalRequest, NearbyHospitalResponse};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(nearby_hospital),
    components(schemas(NearbyHospitalRequest, NearbyHospitalResponse, Hospital, LatLng))
)]
pub struct HospitalApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/nearbyHospital", post(nearby_hospital))
}

/// Places near the caller matching the symptom, plus the caller's address.
///
/// The symptom maps to a place-search keyword; anything unrecognised
/// searches for `hospital`.
#[utoipa::path(
    post,
    path = "/api/nearbyHospital",
    tag = "hospital",
    request_body = NearbyHospitalRequest,
    responses(
        (status = 200, description = "Nearby places", body = NearbyHospitalResponse),
        (status = 400, description = "Coordinates missing or out of range"),
        (status = 500, description = "Maps API error"),
    )
)]
pub async fn nearby_hospital(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<NearbyHospitalRequest>,
) -> Result<Json<NearbyHospitalResponse>, ServerError> {
    let point = LatLng {
        lat: req.latitude,
        lng: req.longitude,
    };
    let keyword = search_term(&req.symptom);
    let (hospitals, user_address) = state.upstream.maps.locate(point, keyword).await?;

    info!(keyword, found = hospitals.len(), "nearby search");
    Ok(Json(NearbyHospitalResponse {
        hospitals,
        user_address,
        search_term: keyword.to_owned(),
    }))
}
