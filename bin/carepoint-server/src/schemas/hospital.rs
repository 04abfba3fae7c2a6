use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A coordinate pair in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Body of `POST /api/nearbyHospital`.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct NearbyHospitalRequest {
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be within ±90"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be within ±180"))]
    pub longitude: f64,
    /// Free-text symptom; an unknown or empty value searches for any hospital.
    #[serde(default)]
    pub symptom: String,
}

/// One place from the nearby search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Hospital {
    pub name: String,
    pub address: String,
    pub location: LatLng,
    pub place_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NearbyHospitalResponse {
    pub hospitals: Vec<Hospital>,
    pub user_address: String,
    /// Keyword the place search ran with.
    pub search_term: String,
}
