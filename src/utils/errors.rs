//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// SQLSTATE de PostgreSQL para violación de unicidad
const UNIQUE_VIOLATION: &str = "23505";

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("External API error: {0}")]
    ExternalApi(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            details: None,
            code: Some(code.to_string()),
        }
    }
}

impl AppError {
    /// Código HTTP asociado a cada variante
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) | AppError::Hash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ExternalApi(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = match self {
            AppError::Database(e) => {
                error!("❌ Database error: {}", e);
                ErrorResponse::new(
                    "Database Error",
                    "An error occurred while accessing the database",
                    "DB_ERROR",
                )
            }

            AppError::Validation(e) => {
                warn!("Validation error: {}", e);
                ErrorResponse {
                    details: Some(json!(e)),
                    ..ErrorResponse::new(
                        "Validation Error",
                        "The provided data is invalid",
                        "VALIDATION_ERROR",
                    )
                }
            }

            AppError::Unauthorized(msg) => ErrorResponse::new("Unauthorized", msg, "UNAUTHORIZED"),

            AppError::Forbidden(msg) => ErrorResponse::new("Forbidden", msg, "FORBIDDEN"),

            AppError::NotFound(msg) => ErrorResponse::new("Not Found", msg, "NOT_FOUND"),

            AppError::Conflict(msg) => ErrorResponse::new("Conflict", msg, "CONFLICT"),

            AppError::BadRequest(msg) => ErrorResponse::new("Bad Request", msg, "BAD_REQUEST"),

            AppError::Internal(msg) => {
                error!("❌ Internal error: {}", msg);
                ErrorResponse::new(
                    "Internal Server Error",
                    "An unexpected error occurred",
                    "INTERNAL_ERROR",
                )
            }

            AppError::Jwt(msg) => {
                warn!("JWT error: {}", msg);
                ErrorResponse::new("Unauthorized", "You are not authorized", "JWT_ERROR")
            }

            AppError::Hash(msg) => {
                error!("❌ Hash error: {}", msg);
                ErrorResponse::new(
                    "Hash Error",
                    "An error occurred while processing credentials",
                    "HASH_ERROR",
                )
            }

            // El detalle del proveedor se queda en el log del controller
            AppError::ExternalApi(msg) => {
                error!("❌ External API error: {}", msg);
                ErrorResponse::new("External API Error", msg, "EXTERNAL_API_ERROR")
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Indica si el error de SQLx es una violación de unicidad
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|db| db.code())
        .map_or(false, |code| code == UNIQUE_VIOLATION)
}

/// Convierte violaciones de unicidad en `Conflict` y el resto en `Database`
pub fn map_unique_violation(error: sqlx::Error, message: &str) -> AppError {
    if is_unique_violation(&error) {
        AppError::Conflict(message.to_string())
    } else {
        AppError::Database(error)
    }
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str) -> AppError {
    AppError::NotFound(format!("{} not found", resource))
}

/// Función helper para crear errores de acceso prohibido
pub fn forbidden_error(message: &str) -> AppError {
    AppError::Forbidden(message.to_string())
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

/// Función helper para crear errores internos
pub fn internal_error(message: impl std::fmt::Display) -> AppError {
    AppError::Internal(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(bad_request_error("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(forbidden_error("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(not_found_error("Package").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Conflict("dup".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Jwt("expired".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::ExternalApi("down".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            internal_error("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_row_not_found_is_not_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        let mapped = map_unique_violation(sqlx::Error::RowNotFound, "duplicate");
        assert!(matches!(mapped, AppError::Database(_)));
    }

    #[test]
    fn test_not_found_message() {
        match not_found_error("Route") {
            AppError::NotFound(msg) => assert_eq!(msg, "Route not found"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = internal_error("password column missing").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("password column"));
        assert!(text.contains("INTERNAL_ERROR"));
    }

    #[tokio::test]
    async fn test_external_api_error_keeps_message() {
        let response =
            AppError::ExternalApi("Route optimization is currently unavailable".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Route optimization is currently unavailable");
        assert_eq!(json["code"], "EXTERNAL_API_ERROR");
    }
}
