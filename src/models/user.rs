//! Modelo de User
//!
//! Este módulo contiene el struct User, su rol y los requests de identidad
//! y autoservicio.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use crate::utils::{errors::AppError, validation::validate_not_blank};

/// Rol del usuario dentro del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
    Owner,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
            UserRole::Owner => "owner",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn is_admin_or_owner(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Owner)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for UserRole {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            "owner" => Ok(UserRole::Owner),
            other => Err(AppError::BadRequest(format!("Invalid role '{}'", other))),
        }
    }
}

/// User - mapea exactamente a la tabla users
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    pub is_verified: bool,
    pub verification_token: Option<String>,
    pub reset_token: Option<String>,
    pub reset_token_expires: Option<DateTime<Utc>>,
    pub company_id: Option<Uuid>,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request de registro
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    #[serde(default, alias = "company_code")]
    pub company_code: Option<String>,
}

/// Request de inicio de sesión
#[derive(Debug, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Request para actualizar el perfil propio
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub name: String,

    /// `None` conserva la empresa actual, cadena vacía la abandona
    #[serde(default, alias = "company_code")]
    pub company_code: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(alias = "old_password")]
    #[validate(length(min = 1))]
    pub old_password: String,

    #[serde(alias = "new_password")]
    #[validate(length(min = 6, max = 100))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 6, max = 100))]
    pub password: String,
}

/// Request de administración sobre un usuario
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateUserRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub name: String,

    pub role: String,

    #[serde(alias = "is_verified")]
    pub is_verified: bool,
}

/// Response de usuario para la API (sin contraseña ni tokens)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_verified: bool,
    pub company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_verified: user.is_verified,
            company_id: user.company_id,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Lucía".to_string(),
            email: "lucia@example.com".to_string(),
            password: "$2b$12$hash".to_string(),
            role: UserRole::User,
            is_verified: true,
            verification_token: Some("abc".to_string()),
            reset_token: Some("def".to_string()),
            reset_token_expires: None,
            company_id: None,
            deleted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(UserRole::try_from("Owner".to_string()).unwrap(), UserRole::Owner);
        assert_eq!(UserRole::try_from("admin".to_string()).unwrap(), UserRole::Admin);
        assert!(UserRole::try_from("superuser".to_string()).is_err());
    }

    #[test]
    fn test_role_predicates() {
        assert!(UserRole::Admin.is_admin());
        assert!(UserRole::Owner.is_admin_or_owner());
        assert!(!UserRole::User.is_admin_or_owner());
    }

    #[test]
    fn test_user_response_hides_secrets() {
        let json = serde_json::to_value(UserResponse::from(sample_user())).unwrap();
        assert_eq!(json["role"], "user");
        assert!(json.get("password").is_none());
        assert!(json.get("verification_token").is_none());
        assert!(json.get("reset_token").is_none());
    }

    #[test]
    fn test_signup_request_accepts_camel_case_code() {
        let request: SignupRequest = serde_json::from_str(
            r#"{"name":"Ana","email":"ana@example.com","password":"secret1","companyCode":"AbC12345"}"#,
        )
        .unwrap();
        assert_eq!(request.company_code.as_deref(), Some("AbC12345"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_signup_request_rejects_short_password() {
        let request = SignupRequest {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "123".to_string(),
            company_code: None,
        };
        assert!(request.validate().is_err());
    }
}
