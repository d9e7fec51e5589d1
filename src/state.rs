//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use anyhow::{Context, Result};
use reqwest::Client;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::config::environment::EnvironmentConfig;
use crate::services::{
    Geocoder, HttpMailer, LogMailer, Mailer, MapboxGeocoder, MapboxOptimizer, RouteOptimizer,
};
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub geocoder: Arc<dyn Geocoder>,
    pub optimizer: Arc<dyn RouteOptimizer>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.external_api_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        if config.mapbox_token.is_none() {
            warn!("⚠️ MAPBOX_TOKEN no configurado: geocodificación y navegación no disponibles");
        }

        let geocoder: Arc<dyn Geocoder> = Arc::new(MapboxGeocoder::new(
            http_client.clone(),
            config.mapbox_base_url.clone(),
            config.mapbox_token.clone(),
            config.geocoding_country.clone(),
        ));

        let optimizer: Arc<dyn RouteOptimizer> = Arc::new(MapboxOptimizer::new(
            http_client.clone(),
            config.mapbox_base_url.clone(),
            config.mapbox_token.clone(),
        ));

        let mailer: Arc<dyn Mailer> = match &config.mail_api_url {
            Some(url) => Arc::new(HttpMailer::new(
                http_client.clone(),
                url.clone(),
                config.mail_api_key.clone(),
                config.mail_from.clone(),
            )),
            None => Arc::new(LogMailer),
        };

        Ok(Self {
            pool,
            config,
            geocoder,
            optimizer,
            mailer,
        })
    }

    /// Sustituye el geocodificador (tests y proveedores alternativos)
    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = geocoder;
        self
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::from(&self.config)
    }
}
