//! Google Maps nearby-search and reverse-geocode client.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{read_json, trim_base, UpstreamError};
use crate::config::Config;
use crate::schemas::hospital::{Hospital, LatLng};

const PLACES: &str = "Google Places";
const GEOCODE: &str = "Google Geocoding";

/// Address reported when reverse geocoding finds nothing.
pub const UNKNOWN_ADDRESS: &str = "Unknown address";

#[derive(Debug, Clone)]
pub struct MapsClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    radius_m: u32,
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    #[serde(default)]
    name: String,
    #[serde(default)]
    vicinity: String,
    geometry: Option<Geometry>,
    #[serde(default)]
    place_id: String,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: Option<String>,
}

impl From<PlaceResult> for Hospital {
    fn from(p: PlaceResult) -> Self {
        Hospital {
            name: p.name,
            address: p.vicinity,
            location: p.geometry.map(|g| g.location).unwrap_or_default(),
            place_id: p.place_id,
        }
    }
}

impl MapsClient {
    pub fn new(http: reqwest::Client, cfg: &Config) -> Self {
        Self {
            http,
            api_key: cfg.maps_api_key.clone(),
            base_url: trim_base(&cfg.maps_base_url),
            radius_m: cfg.search_radius_m,
        }
    }

    fn key(&self, service: &'static str) -> Result<&str, UpstreamError> {
        self.api_key
            .as_deref()
            .ok_or(UpstreamError::MissingKey { service })
    }

    /// Places matching `keyword` within the configured radius of the point.
    ///
    /// `ZERO_RESULTS` is an empty list; any other non-`OK` status is an error.
    pub async fn nearby(
        &self,
        point: LatLng,
        keyword: &str,
    ) -> Result<Vec<Hospital>, UpstreamError> {
        let key = self.key(PLACES)?;
        let location = format!("{},{}", point.lat, point.lng);
        let radius = self.radius_m.to_string();
        let resp = self
            .http
            .get(format!("{}/maps/api/place/nearbysearch/json", self.base_url))
            .query(&[
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("keyword", keyword),
                ("key", key),
            ])
            .send()
            .await
            .map_err(UpstreamError::transport(PLACES))?;

        let parsed: PlacesResponse = read_json(PLACES, resp).await?;
        match parsed.status.as_str() {
            "OK" | "ZERO_RESULTS" => {}
            other => {
                return Err(UpstreamError::Status {
                    service: PLACES,
                    status: 200,
                    body: json!({
                        "status": other,
                        "error_message": parsed.error_message,
                    }),
                });
            }
        }
        debug!(keyword, count = parsed.results.len(), "nearby search done");
        Ok(parsed.results.into_iter().map(Hospital::from).collect())
    }

    /// Formatted address of the point, or [`UNKNOWN_ADDRESS`].
    pub async fn reverse_geocode(&self, point: LatLng) -> Result<String, UpstreamError> {
        let key = self.key(GEOCODE)?;
        let latlng = format!("{},{}", point.lat, point.lng);
        let resp = self
            .http
            .get(format!("{}/maps/api/geocode/json", self.base_url))
            .query(&[("latlng", latlng.as_str()), ("key", key)])
            .send()
            .await
            .map_err(UpstreamError::transport(GEOCODE))?;

        let parsed: GeocodeResponse = read_json(GEOCODE, resp).await?;
        Ok(parsed
            .results
            .into_iter()
            .next()
            .and_then(|r| r.formatted_address)
            .unwrap_or_else(|| UNKNOWN_ADDRESS.to_owned()))
    }

    /// Run the place search and the reverse geocode concurrently.
    ///
    /// Both must succeed; the first failure fails the whole lookup.
    pub async fn locate(
        &self,
        point: LatLng,
        keyword: &str,
    ) -> Result<(Vec<Hospital>, String), UpstreamError> {
        tokio::try_join!(self.nearby(point, keyword), self.reverse_geocode(point))
    }
}
