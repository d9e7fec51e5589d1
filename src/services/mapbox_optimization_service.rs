//! Servicio para Mapbox Optimization API v1
//!
//! Este módulo envía la posición actual y las paradas de una ruta a Mapbox
//! y traduce la permutación devuelta a índices de parada.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use crate::dto::mapbox_dto::{MapboxOptimizationResponse, MapboxWaypointV1};
use crate::services::geocoding_service::Coordinates;

/// Límite de coordenadas por petición de la API v1 (origen incluido)
pub const MAX_COORDINATES: usize = 12;

/// Viaje optimizado. `order` contiene índices de `stops` en orden de visita.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedTrip {
    pub order: Vec<usize>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

#[async_trait]
pub trait RouteOptimizer: Send + Sync {
    async fn optimize(&self, origin: Coordinates, stops: &[Coordinates]) -> Result<OptimizedTrip>;
}

pub struct MapboxOptimizer {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl MapboxOptimizer {
    pub fn new(client: Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn trip_url(&self, origin: Coordinates, stops: &[Coordinates], token: &str) -> String {
        let coordinates = std::iter::once(origin)
            .chain(stops.iter().copied())
            .map(|c| format!("{},{}", c.longitude, c.latitude))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/optimized-trips/v1/mapbox/driving/{}?source=first&roundtrip=true&access_token={}",
            self.base_url,
            coordinates,
            urlencoding::encode(token)
        )
    }
}

/// Ordena las paradas según `waypoint_index`. El primer waypoint es el origen.
pub fn visiting_order(waypoints: &[MapboxWaypointV1]) -> Vec<usize> {
    let mut stops: Vec<(usize, usize)> = waypoints
        .iter()
        .enumerate()
        .skip(1)
        .map(|(input_index, waypoint)| (waypoint.waypoint_index, input_index - 1))
        .collect();
    stops.sort_by_key(|(position, _)| *position);
    stops.into_iter().map(|(_, stop)| stop).collect()
}

#[async_trait]
impl RouteOptimizer for MapboxOptimizer {
    async fn optimize(&self, origin: Coordinates, stops: &[Coordinates]) -> Result<OptimizedTrip> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| anyhow!("MAPBOX_TOKEN is not configured"))?;

        if stops.is_empty() || stops.len() + 1 > MAX_COORDINATES {
            return Err(anyhow!("Unsupported number of stops: {}", stops.len()));
        }

        info!("🚀 Optimizando ruta con Mapbox para {} paradas", stops.len());

        let response = self
            .client
            .get(self.trip_url(origin, stops, token))
            .header("User-Agent", "FastRoute/1.0")
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;
        if !status.is_success() {
            return Err(anyhow!("Mapbox API error {}: {}", status, response_text));
        }

        let body: MapboxOptimizationResponse = serde_json::from_str(&response_text)
            .map_err(|e| anyhow!("Error parsing Mapbox response: {}", e))?;

        if body.code != "Ok" {
            return Err(anyhow!(
                "Mapbox returned {}: {}",
                body.code,
                body.message.unwrap_or_default()
            ));
        }

        let waypoints = body
            .waypoints
            .ok_or_else(|| anyhow!("Mapbox response without waypoints"))?;
        if waypoints.len() != stops.len() + 1 {
            return Err(anyhow!(
                "Mapbox returned {} waypoints for {} coordinates",
                waypoints.len(),
                stops.len() + 1
            ));
        }

        let trip = body
            .trips
            .and_then(|trips| trips.into_iter().next())
            .ok_or_else(|| anyhow!("Mapbox response without trips"))?;

        let order = visiting_order(&waypoints);
        info!("✅ Optimización completada: {:.0} m, {:.0} s", trip.distance, trip.duration);

        Ok(OptimizedTrip {
            order,
            distance_meters: trip.distance,
            duration_seconds: trip.duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn waypoint(waypoint_index: usize) -> MapboxWaypointV1 {
        MapboxWaypointV1 { waypoint_index }
    }

    fn coords(latitude: f64, longitude: f64) -> Coordinates {
        Coordinates { latitude, longitude }
    }

    #[test]
    fn test_visiting_order_follows_waypoint_index() {
        // origen en 0; la parada 2 se visita primero, luego la 0, luego la 1
        let waypoints = vec![waypoint(0), waypoint(2), waypoint(3), waypoint(1)];
        assert_eq!(visiting_order(&waypoints), vec![2, 0, 1]);
    }

    #[test]
    fn test_trip_url_puts_origin_first_as_lng_lat() {
        let optimizer = MapboxOptimizer::new(Client::new(), "https://api.mapbox.com", None);
        let url = optimizer.trip_url(coords(40.0, -3.0), &[coords(41.0, 2.0)], "tk");
        assert!(url.contains("/optimized-trips/v1/mapbox/driving/-3,40;2,41?"));
        assert!(url.contains("source=first"));
        assert!(url.contains("roundtrip=true"));
    }

    #[tokio::test]
    async fn test_optimize_translates_permutation() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", Matcher::Regex(r"^/optimized-trips/v1/mapbox/driving/".to_string()))
            .match_query(Matcher::UrlEncoded("source".into(), "first".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "code": "Ok",
                    "waypoints": [
                        {"waypoint_index": 0, "trips_index": 0, "name": "", "location": [-3.70, 40.41]},
                        {"waypoint_index": 2, "trips_index": 0, "name": "", "location": [-3.60, 40.50]},
                        {"waypoint_index": 1, "trips_index": 0, "name": "", "location": [-3.65, 40.45]}
                    ],
                    "trips": [{"geometry": "abc", "legs": [], "weight_name": "routability", "weight": 1.0, "duration": 900.5, "distance": 12500.0}]
                }"#,
            )
            .create_async()
            .await;

        let optimizer = MapboxOptimizer::new(Client::new(), server.url(), Some("tk".to_string()));
        let trip = optimizer
            .optimize(coords(40.41, -3.70), &[coords(40.50, -3.60), coords(40.45, -3.65)])
            .await
            .unwrap();

        assert_eq!(trip.order, vec![1, 0]);
        assert_eq!(trip.distance_meters, 12500.0);
        assert_eq!(trip.duration_seconds, 900.5);
    }

    #[tokio::test]
    async fn test_optimize_provider_error_code() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", Matcher::Regex(r"^/optimized-trips/".to_string()))
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"code": "NoTrips", "message": "No trips found"}"#)
            .create_async()
            .await;

        let optimizer = MapboxOptimizer::new(Client::new(), server.url(), Some("tk".to_string()));
        let result = optimizer.optimize(coords(40.0, -3.0), &[coords(41.0, -3.5)]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_optimize_rejects_too_many_stops() {
        let optimizer = MapboxOptimizer::new(Client::new(), "http://127.0.0.1:9", Some("tk".to_string()));
        let stops = vec![coords(40.0, -3.0); MAX_COORDINATES];
        assert!(optimizer.optimize(coords(40.0, -3.0), &stops).await.is_err());
    }
}
