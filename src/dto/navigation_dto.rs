//! DTOs de navegación
//!
//! Resultado de optimizar una ruta y enlace para continuar en la app de mapas.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Posición actual del repartidor
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct NavigationQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Parada ya ordenada por el optimizador
#[derive(Debug, Clone, Serialize)]
pub struct NavigationStop {
    pub order: usize,
    pub package_id: Uuid,
    pub name: String,
    pub destination_address: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavigationResponse {
    pub route_id: Uuid,
    pub origin: [f64; 2], // [lat, lng]
    pub stops: Vec<NavigationStop>,
    /// Coordenadas "lat,lng" en el orden de visita
    pub waypoint_order: Vec<String>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub maps_url: String,
}
