use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use crate::dto::mapbox_dto::MapboxGeocodingResponse;

/// Coordenadas resueltas para una dirección
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Proveedor de geocodificación. `Ok(None)` significa "sin resultados".
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>>;
}

/// Cliente de Mapbox Geocoding v6
pub struct MapboxGeocoder {
    client: Client,
    base_url: String,
    token: Option<String>,
    country: Option<String>,
}

impl MapboxGeocoder {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        token: Option<String>,
        country: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            country,
        }
    }

    fn forward_url(&self, address: &str, token: &str) -> String {
        let mut url = format!(
            "{}/search/geocode/v6/forward?q={}&access_token={}&limit=1",
            self.base_url,
            urlencoding::encode(address),
            urlencoding::encode(token)
        );
        if let Some(country) = &self.country {
            url.push_str(&format!("&country={}", urlencoding::encode(country)));
        }
        url
    }
}

#[async_trait]
impl Geocoder for MapboxGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| anyhow!("MAPBOX_TOKEN is not configured"))?;

        info!("🗺️ Geocoding address: {}", address);

        let response = self
            .client
            .get(self.forward_url(address, token))
            .header("User-Agent", "FastRoute/1.0")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Geocoding failed with status {}: {}", status, error_text));
        }

        let body: MapboxGeocodingResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse geocoding response: {}", e))?;

        // Primera feature: resultado más relevante, coordenadas [lng, lat]
        let coordinates = body
            .features
            .first()
            .filter(|feature| feature.geometry.coordinates.len() >= 2)
            .map(|feature| Coordinates {
                longitude: feature.geometry.coordinates[0],
                latitude: feature.geometry.coordinates[1],
            });

        match coordinates {
            Some(c) => info!("✅ Geocoding successful: {} -> ({}, {})", address, c.latitude, c.longitude),
            None => warn!("⚠️ No coordinates found for address: {}", address),
        }

        Ok(coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn geocoder(base_url: &str) -> MapboxGeocoder {
        MapboxGeocoder::new(Client::new(), base_url, Some("test-token".to_string()), None)
    }

    #[tokio::test]
    async fn test_geocode_returns_first_feature() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search/geocode/v6/forward")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "Calle Mayor 1, Madrid".into()),
                Matcher::UrlEncoded("access_token".into(), "test-token".into()),
                Matcher::UrlEncoded("limit".into(), "1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"type":"FeatureCollection","features":[
                    {"type":"Feature","geometry":{"type":"Point","coordinates":[-3.7077,40.4155]},"properties":{"full_address":"Calle Mayor 1"}},
                    {"type":"Feature","geometry":{"type":"Point","coordinates":[0.0,0.0]},"properties":{}}
                ]}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let result = geocoder(&server.url())
            .geocode("Calle Mayor 1, Madrid")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            result,
            Some(Coordinates {
                latitude: 40.4155,
                longitude: -3.7077
            })
        );
    }

    #[tokio::test]
    async fn test_geocode_without_features_is_none() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/search/geocode/v6/forward")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"type":"FeatureCollection","features":[]}"#)
            .create_async()
            .await;

        let result = geocoder(&server.url()).geocode("nowhere").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_geocode_http_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/search/geocode/v6/forward")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message":"Not Authorized - Invalid Token"}"#)
            .create_async()
            .await;

        assert!(geocoder(&server.url()).geocode("Gran Vía 1").await.is_err());
    }

    #[tokio::test]
    async fn test_geocode_without_token_fails_before_request() {
        let geocoder = MapboxGeocoder::new(Client::new(), "http://127.0.0.1:9", None, None);
        assert!(geocoder.geocode("Gran Vía 1").await.is_err());
    }

    #[test]
    fn test_forward_url_includes_country_filter() {
        let geocoder = MapboxGeocoder::new(
            Client::new(),
            "https://api.mapbox.com/",
            Some("tk".to_string()),
            Some("es".to_string()),
        );
        let url = geocoder.forward_url("Plaza Mayor", "tk");
        assert!(url.starts_with("https://api.mapbox.com/search/geocode/v6/forward?q=Plaza%20Mayor"));
        assert!(url.ends_with("&country=es"));
    }
}
