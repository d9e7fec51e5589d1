//! FastRoute: backend de reparto multi-empresa
//!
//! Usuarios, empresas, paquetes, rutas, fichajes y soporte sobre axum + sqlx,
//! con geocodificación y optimización de rutas contra Mapbox.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{routing::get, Router};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors_middleware_with_origins;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_app(state: AppState) -> Router {
    let cors = cors_middleware_with_origins(&state.config.cors_origins);

    Router::new()
        .route("/", get(routes::health_routes::welcome))
        .nest("/api", routes::create_api_router(state.clone()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
