use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::models::user::{
    AdminUpdateUserRequest, ChangePasswordRequest, ForgotPasswordRequest, ResetPasswordRequest,
    SigninRequest, SignupRequest, UpdateProfileRequest, User, UserResponse, UserRole,
};
use crate::repositories::company_repository::CompanyRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::mail_service::{reset_password_email, verification_email, Mailer};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, forbidden_error, not_found_error, AppError};
use crate::utils::jwt::{generate_token, JwtConfig};
use crate::utils::tokens::generate_secure_token;

const RESET_TOKEN_TTL_HOURS: i64 = 1;

pub struct AuthController {
    users: UserRepository,
    companies: CompanyRepository,
    mailer: Arc<dyn Mailer>,
    jwt: JwtConfig,
    frontend_url: String,
}

impl AuthController {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: UserRepository::new(state.pool.clone()),
            companies: CompanyRepository::new(state.pool.clone()),
            mailer: state.mailer.clone(),
            jwt: state.jwt_config(),
            frontend_url: state.config.frontend_url.clone(),
        }
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<UserResponse, AppError> {
        let email = normalize_email(&request.email);
        let company_id = self.resolve_company_code(request.company_code.as_deref()).await?;

        let password_hash = hash_password(&request.password)?;
        let verification_token = generate_secure_token();

        let user = self
            .users
            .create(
                request.name.trim(),
                &email,
                &password_hash,
                &verification_token,
                company_id.flatten(),
            )
            .await?;

        self.mailer
            .send(verification_email(&user.email, &self.frontend_url, &verification_token))
            .await
            .map_err(|e| AppError::Internal(format!("Error sending verification email: {}", e)))?;

        info!("👤 Usuario registrado: {}", user.id);
        Ok(user.into())
    }

    /// Devuelve el usuario y su token de sesión
    pub async fn signin(&self, request: SigninRequest) -> Result<(UserResponse, String), AppError> {
        let email = normalize_email(&request.email);

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None if self.users.deleted_email_exists(&email).await? => {
                return Err(forbidden_error(
                    "This account has been deactivated. Contact support to restore it.",
                ));
            }
            None => return Err(bad_request_error("Email is not registered")),
        };

        if !user.is_verified {
            return Err(AppError::Unauthorized(
                "You must verify your email before signing in.".to_string(),
            ));
        }

        if !verify_password(&request.password, &user.password)? {
            return Err(bad_request_error("Incorrect password"));
        }

        let token = generate_token(user.id, user.role, &self.jwt)?;
        Ok((user.into(), token))
    }

    pub async fn verify_email(&self, token: &str) -> Result<(), AppError> {
        if !self.users.verify_email(token).await? {
            return Err(bad_request_error("Invalid verification token"));
        }
        Ok(())
    }

    pub async fn forgot_password(&self, request: ForgotPasswordRequest) -> Result<(), AppError> {
        let user = self
            .users
            .find_by_email(&normalize_email(&request.email))
            .await?
            .ok_or_else(|| not_found_error("User"))?;

        let token = generate_secure_token();
        let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);
        self.users.set_reset_token(user.id, &token, expires_at).await?;

        self.mailer
            .send(reset_password_email(&user.email, &self.frontend_url, &token))
            .await
            .map_err(|e| AppError::Internal(format!("Error sending reset email: {}", e)))?;

        Ok(())
    }

    pub async fn reset_password(
        &self,
        token: &str,
        request: ResetPasswordRequest,
    ) -> Result<(), AppError> {
        let password_hash = hash_password(&request.password)?;

        if !self.users.reset_password(token, &password_hash).await? {
            return Err(bad_request_error("Invalid or expired token"));
        }
        Ok(())
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserResponse, AppError> {
        Ok(self.find_user(user_id).await?.into())
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<UserResponse, AppError> {
        let current = self.find_user(user_id).await?;
        let company_id = self
            .resolve_company_code(request.company_code.as_deref())
            .await?
            .unwrap_or(current.company_id);

        let user = self
            .users
            .update_profile(user_id, request.name.trim(), company_id)
            .await?
            .ok_or_else(|| not_found_error("User"))?;

        Ok(user.into())
    }

    pub async fn delete_profile(&self, user_id: Uuid) -> Result<(), AppError> {
        if !self.users.soft_delete(user_id).await? {
            return Err(not_found_error("User"));
        }
        Ok(())
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        request: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        let user = self.find_user(user_id).await?;

        if !verify_password(&request.old_password, &user.password)? {
            return Err(bad_request_error("Incorrect password"));
        }

        let password_hash = hash_password(&request.new_password)?;
        self.users.update_password(user_id, &password_hash).await
    }

    pub async fn leave_company(&self, user_id: Uuid) -> Result<(), AppError> {
        if !self.users.leave_company(user_id).await? {
            return Err(not_found_error("User"));
        }
        Ok(())
    }

    // --- Administración ---

    pub async fn list_users(&self) -> Result<Vec<UserResponse>, AppError> {
        let users = self.users.list_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<UserResponse, AppError> {
        self.profile(user_id).await
    }

    pub async fn admin_update_user(
        &self,
        user_id: Uuid,
        request: AdminUpdateUserRequest,
    ) -> Result<UserResponse, AppError> {
        let role = UserRole::try_from(request.role)?;

        let user = self
            .users
            .admin_update(user_id, request.name.trim(), role, request.is_verified)
            .await?
            .ok_or_else(|| not_found_error("User"))?;

        Ok(user.into())
    }

    pub async fn admin_delete_user(&self, user_id: Uuid) -> Result<(), AppError> {
        self.delete_profile(user_id).await
    }

    async fn find_user(&self, user_id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| not_found_error("User"))
    }

    /// `None`: sin cambios. `Some(None)`: abandonar empresa. `Some(Some(id))`: unirse.
    async fn resolve_company_code(
        &self,
        code: Option<&str>,
    ) -> Result<Option<Option<Uuid>>, AppError> {
        let Some(code) = code else {
            return Ok(None);
        };

        let code = code.trim();
        if code.is_empty() {
            return Ok(Some(None));
        }

        let company = self
            .companies
            .find_by_join_code(code)
            .await?
            .ok_or_else(|| bad_request_error("Invalid company code"))?;

        Ok(Some(Some(company.id)))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST).map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))
}

fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    verify(password, password_hash)
        .map_err(|e| AppError::Hash(format!("Error verifying password: {}", e)))
}
