//! Modelo de Route
//!
//! Rutas de reparto, su estado y la relación con los packages que agrupan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use crate::utils::{errors::AppError, validation::validate_not_blank};

/// Estado de una ruta. Solo cambia por actualización explícita.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl RouteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStatus::Pending => "pending",
            RouteStatus::InProgress => "in-progress",
            RouteStatus::Completed => "completed",
        }
    }

    /// Acepta el valor canónico y los alias que usan los clientes
    pub fn parse(value: &str) -> Result<Self, AppError> {
        let normalized = value.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "pending" | "pendiente" => Ok(RouteStatus::Pending),
            "in-progress" | "en-progreso" => Ok(RouteStatus::InProgress),
            "completed" | "completada" => Ok(RouteStatus::Completed),
            _ => Err(AppError::BadRequest(format!(
                "Invalid status '{}'. Allowed values: pending, in-progress, completed",
                value
            ))),
        }
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for RouteStatus {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RouteStatus::parse(&value)
    }
}

/// Route - mapea exactamente a la tabla routes
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Route {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub status: RouteStatus,
    #[serde(skip_serializing)]
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

/// Route con el usuario asignado, para el listado de administración
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RouteWithUser {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub status: RouteStatus,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
    pub user_email: String,
}

/// Package dentro de una ruta
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RoutePackage {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub priority: i32,
    pub destination_address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub delivered: bool,
}

/// Ruta con sus packages
#[derive(Debug, Clone, Serialize)]
pub struct RouteDetail {
    #[serde(flatten)]
    pub route: Route,
    pub packages: Vec<RoutePackage>,
}

/// Request de creación/edición de ruta
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub name: String,

    /// Si falta se conserva el estado actual (`pending` al crear)
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default, alias = "package_ids")]
    pub package_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RouteStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteNameResponse {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteCreatedResponse {
    #[serde(rename = "routeId")]
    pub route_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_canonical_values() {
        assert_eq!(RouteStatus::parse("pending").unwrap(), RouteStatus::Pending);
        assert_eq!(RouteStatus::parse("in-progress").unwrap(), RouteStatus::InProgress);
        assert_eq!(RouteStatus::parse("completed").unwrap(), RouteStatus::Completed);
    }

    #[test]
    fn test_status_aliases() {
        assert_eq!(RouteStatus::parse("In Progress").unwrap(), RouteStatus::InProgress);
        assert_eq!(RouteStatus::parse("in_progress").unwrap(), RouteStatus::InProgress);
        assert_eq!(RouteStatus::parse("en progreso").unwrap(), RouteStatus::InProgress);
        assert_eq!(RouteStatus::parse("Pendiente").unwrap(), RouteStatus::Pending);
        assert_eq!(RouteStatus::parse("completada").unwrap(), RouteStatus::Completed);
    }

    #[test]
    fn test_status_rejects_unknown_values() {
        assert!(matches!(RouteStatus::parse("bogus"), Err(AppError::BadRequest(_))));
        assert!(RouteStatus::parse("").is_err());
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_value(RouteStatus::InProgress).unwrap(),
            serde_json::json!("in-progress")
        );
        assert_eq!(RouteStatus::default(), RouteStatus::Pending);
    }

    #[test]
    fn test_route_request_package_ids_alias() {
        let id = Uuid::new_v4();
        let body = format!(r#"{{"name":"Norte","package_ids":["{}"]}}"#, id);
        let req: RouteRequest = serde_json::from_str(&body).unwrap();
        assert_eq!(req.package_ids, vec![id]);
        assert!(req.status.is_none());
    }

    #[test]
    fn test_route_created_response_uses_route_id_key() {
        let response = RouteCreatedResponse { route_id: Uuid::nil() };
        let json = serde_json::to_value(response).unwrap();
        assert!(json.get("routeId").is_some());
    }
}
