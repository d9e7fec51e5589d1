//! Ensamblado de la navegación de una ruta
//!
//! Traduce el orden devuelto por el optimizador a paradas numeradas y al
//! enlace para continuar la navegación en Google Maps.

use uuid::Uuid;

use crate::dto::navigation_dto::{NavigationQuery, NavigationResponse, NavigationStop};
use crate::models::route::RoutePackage;
use crate::services::geocoding_service::Coordinates;
use crate::services::mapbox_optimization_service::{OptimizedTrip, MAX_COORDINATES};
use crate::utils::errors::{bad_request_error, AppError};

/// Origen por defecto cuando el cliente no envía su posición (Madrid)
pub const DEFAULT_ORIGIN: Coordinates = Coordinates {
    latitude: 40.4167,
    longitude: -3.70325,
};

const GOOGLE_MAPS_DIR_URL: &str = "https://www.google.com/maps/dir/?api=1";

pub fn origin_from_query(query: &NavigationQuery) -> Coordinates {
    match (query.lat, query.lng) {
        (Some(latitude), Some(longitude)) => Coordinates {
            latitude,
            longitude,
        },
        _ => DEFAULT_ORIGIN,
    }
}

/// Comprueba que la ruta cabe en una sola petición al optimizador
pub fn ensure_routable(packages: &[RoutePackage]) -> Result<(), AppError> {
    if packages.is_empty() {
        return Err(bad_request_error("This route has no packages to navigate"));
    }

    let max_stops = MAX_COORDINATES - 1;
    if packages.len() > max_stops {
        return Err(AppError::BadRequest(format!(
            "A route can be navigated with at most {} packages",
            max_stops
        )));
    }

    Ok(())
}

pub fn stop_coordinates(packages: &[RoutePackage]) -> Vec<Coordinates> {
    packages
        .iter()
        .map(|p| Coordinates {
            latitude: p.latitude,
            longitude: p.longitude,
        })
        .collect()
}

pub fn build_navigation(
    route_id: Uuid,
    origin: Coordinates,
    packages: &[RoutePackage],
    trip: &OptimizedTrip,
) -> NavigationResponse {
    let stops: Vec<NavigationStop> = trip
        .order
        .iter()
        .filter_map(|&index| packages.get(index))
        .enumerate()
        .map(|(position, package)| NavigationStop {
            order: position + 1,
            package_id: package.id,
            name: package.name.clone(),
            destination_address: package.destination_address.clone(),
            latitude: package.latitude,
            longitude: package.longitude,
        })
        .collect();

    let waypoint_order: Vec<String> = stops
        .iter()
        .map(|stop| format_point(stop.latitude, stop.longitude))
        .collect();

    NavigationResponse {
        route_id,
        origin: [origin.latitude, origin.longitude],
        maps_url: maps_url(&waypoint_order),
        stops,
        waypoint_order,
        distance_meters: trip.distance_meters,
        duration_seconds: trip.duration_seconds,
    }
}

/// La última parada es el destino; el resto van como waypoints separados por `|`
pub fn maps_url(points: &[String]) -> String {
    let Some((destination, waypoints)) = points.split_last() else {
        return format!("{}&origin=My+Location&travelmode=driving", GOOGLE_MAPS_DIR_URL);
    };

    let mut url = format!(
        "{}&origin=My+Location&destination={}&travelmode=driving",
        GOOGLE_MAPS_DIR_URL,
        urlencoding::encode(destination)
    );

    if !waypoints.is_empty() {
        url.push_str("&waypoints=");
        url.push_str(&urlencoding::encode(&waypoints.join("|")));
    }

    url
}

fn format_point(latitude: f64, longitude: f64) -> String {
    format!("{},{}", latitude, longitude)
}
