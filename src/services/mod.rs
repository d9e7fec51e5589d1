//! Servicios: colaboradores externos y reglas transversales
//!
//! Geocodificación y optimización contra Mapbox, correo transaccional
//! y la cadena de autorización owner → empresa → empleado.

pub mod authorization_service;
pub mod geocoding_service;
pub mod mail_service;
pub mod mapbox_optimization_service;
pub mod navigation_service;

pub use authorization_service::{AuthorizationService, ScopeStore};
pub use geocoding_service::{Coordinates, Geocoder, MapboxGeocoder};
pub use mail_service::{HttpMailer, LogMailer, Mailer};
pub use mapbox_optimization_service::{MapboxOptimizer, OptimizedTrip, RouteOptimizer};
