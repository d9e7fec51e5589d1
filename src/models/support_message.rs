//! Modelo de SupportMessage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::utils::{errors::AppError, validation::validate_not_blank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupportCategory {
    #[serde(rename = "Error técnico")]
    TechnicalError,
    #[serde(rename = "Sugerencia")]
    Suggestion,
    #[serde(rename = "Pregunta")]
    Question,
    #[serde(rename = "Otro")]
    Other,
}

impl SupportCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportCategory::TechnicalError => "Error técnico",
            SupportCategory::Suggestion => "Sugerencia",
            SupportCategory::Question => "Pregunta",
            SupportCategory::Other => "Otro",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value.trim() {
            "Error técnico" => Ok(SupportCategory::TechnicalError),
            "Sugerencia" => Ok(SupportCategory::Suggestion),
            "Pregunta" => Ok(SupportCategory::Question),
            "Otro" => Ok(SupportCategory::Other),
            _ => Err(AppError::BadRequest(
                "Invalid category. Allowed values: Error técnico, Sugerencia, Pregunta, Otro"
                    .to_string(),
            )),
        }
    }
}

impl TryFrom<String> for SupportCategory {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SupportCategory::parse(&value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SupportStatus {
    #[default]
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "En proceso")]
    InProcess,
    #[serde(rename = "Resuelto")]
    Resolved,
}

impl SupportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportStatus::Pending => "Pendiente",
            SupportStatus::InProcess => "En proceso",
            SupportStatus::Resolved => "Resuelto",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value.trim() {
            "Pendiente" => Ok(SupportStatus::Pending),
            "En proceso" => Ok(SupportStatus::InProcess),
            "Resuelto" => Ok(SupportStatus::Resolved),
            _ => Err(AppError::BadRequest("Invalid status".to_string())),
        }
    }
}

impl TryFrom<String> for SupportStatus {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SupportStatus::parse(&value)
    }
}

/// SupportMessage - mapea exactamente a la tabla support_messages
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SupportMessage {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(try_from = "String")]
    pub category: SupportCategory,
    pub message: String,
    #[sqlx(try_from = "String")]
    pub status: SupportStatus,
    #[serde(skip_serializing)]
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

/// Mensaje con el remitente, para el panel de administración
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SupportMessageWithUser {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(try_from = "String")]
    pub category: SupportCategory,
    pub message: String,
    #[sqlx(try_from = "String")]
    pub status: SupportStatus,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
    pub user_email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupportRequest {
    pub category: String,

    #[validate(length(min = 1, max = 1000), custom = "validate_not_blank")]
    pub message: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSupportStatusRequest {
    pub status: String,
}
