//! DTOs para las APIs de Mapbox
//!
//! Respuestas de Geocoding v6 y de Optimization v1 tal como llegan del proveedor.

use serde::Deserialize;

/// Response de Mapbox Geocoding v6 (forward)
#[derive(Debug, Deserialize)]
pub struct MapboxGeocodingResponse {
    #[serde(default)]
    pub features: Vec<MapboxFeature>,
}

#[derive(Debug, Deserialize)]
pub struct MapboxFeature {
    pub geometry: MapboxGeometry,
}

#[derive(Debug, Deserialize)]
pub struct MapboxGeometry {
    pub coordinates: Vec<f64>, // [longitude, latitude]
}

/// Response de Mapbox Optimization API v1
#[derive(Debug, Deserialize)]
pub struct MapboxOptimizationResponse {
    pub code: String,
    pub message: Option<String>,
    pub waypoints: Option<Vec<MapboxWaypointV1>>,
    pub trips: Option<Vec<MapboxTripV1>>,
}

/// Waypoint en la respuesta v1, en el orden de entrada
#[derive(Debug, Deserialize)]
pub struct MapboxWaypointV1 {
    pub waypoint_index: usize,
}

/// Trip en la respuesta v1
#[derive(Debug, Deserialize)]
pub struct MapboxTripV1 {
    pub duration: f64,
    pub distance: f64,
}
