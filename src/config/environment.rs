//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use anyhow::{Context, Result};
use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cookie_secure: bool,
    pub cors_origins: Vec<String>,
    pub frontend_url: String,
    pub mapbox_token: Option<String>,
    pub mapbox_base_url: String,
    pub geocoding_country: Option<String>,
    pub external_api_timeout_secs: u64,
    // Correo transaccional
    pub mail_api_url: Option<String>,
    pub mail_api_key: Option<String>,
    pub mail_from: String,
    pub support_email: String,
}

impl EnvironmentConfig {
    /// Cargar configuración desde variables de entorno
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_expiration: env::var("JWT_EXPIRATION")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .context("JWT_EXPIRATION must be a valid number")?,
            cookie_secure: env::var("COOKIE_SECURE")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
            cors_origins: split_origins(
                &env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".to_string()),
            ),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            mapbox_token: env::var("MAPBOX_TOKEN").ok().filter(|t| !t.is_empty()),
            mapbox_base_url: env::var("MAPBOX_BASE_URL")
                .unwrap_or_else(|_| "https://api.mapbox.com".to_string()),
            geocoding_country: env::var("GEOCODING_COUNTRY").ok().filter(|c| !c.is_empty()),
            external_api_timeout_secs: env::var("EXTERNAL_API_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("EXTERNAL_API_TIMEOUT_SECS must be a valid number")?,
            mail_api_url: env::var("MAIL_API_URL").ok().filter(|u| !u.is_empty()),
            mail_api_key: env::var("MAIL_API_KEY").ok().filter(|k| !k.is_empty()),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "FastRoute <no-reply@fastroute.app>".to_string()),
            support_email: env::var("SUPPORT_EMAIL")
                .unwrap_or_else(|_| "support@fastroute.app".to_string()),
        })
    }

    /// Configuración con valores por defecto, sin leer el entorno
    pub fn with_defaults(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            environment: "development".to_string(),
            port: 4000,
            host: "0.0.0.0".to_string(),
            database_url: database_url.into(),
            jwt_secret: jwt_secret.into(),
            jwt_expiration: 86400,
            cookie_secure: true,
            cors_origins: vec!["http://localhost:5173".to_string()],
            frontend_url: "http://localhost:5173".to_string(),
            mapbox_token: None,
            mapbox_base_url: "https://api.mapbox.com".to_string(),
            geocoding_country: None,
            external_api_timeout_secs: 10,
            mail_api_url: None,
            mail_api_key: None,
            mail_from: "FastRoute <no-reply@fastroute.app>".to_string(),
            support_email: "support@fastroute.app".to_string(),
        }
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(value.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off")
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(" OFF "));
    }

    #[test]
    fn test_split_origins() {
        let origins = split_origins("http://a.com, http://b.com,,");
        assert_eq!(origins, vec!["http://a.com", "http://b.com"]);
    }

    #[test]
    fn test_server_url() {
        let config = EnvironmentConfig::with_defaults("postgres://localhost/fastroute", "secret");
        assert_eq!(config.server_url(), "0.0.0.0:4000");
        assert!(!config.is_production());
    }
}
