//! Modelo de Package
//!
//! Paquetes asignados a un usuario, con coordenadas resueltas por geocodificación.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::validate_not_blank;

/// Package - mapea exactamente a la tabla packages
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Package {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub priority: i32,
    pub destination_address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub delivered: bool,
    #[serde(skip_serializing)]
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

/// Request para crear o actualizar un package
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PackageRequest {
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(range(min = 0, max = 10))]
    pub priority: i32,

    #[serde(alias = "destination_address")]
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub destination_address: String,
}

/// Request de administración: además permite reasignar el package
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdatePackageRequest {
    #[serde(flatten)]
    #[validate]
    pub package: PackageRequest,

    #[serde(default, alias = "user_id")]
    pub user_id: Option<Uuid>,
}

/// Datos listos para persistir, con las coordenadas ya resueltas
#[derive(Debug, Clone)]
pub struct PackageDraft {
    pub name: String,
    pub description: Option<String>,
    pub priority: i32,
    pub destination_address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl PackageDraft {
    pub fn new(request: PackageRequest, latitude: f64, longitude: f64) -> Self {
        Self {
            name: request.name.trim().to_string(),
            description: request
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            priority: request.priority,
            destination_address: request.destination_address.trim().to_string(),
            latitude,
            longitude,
        }
    }
}
