use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{User, UserRole};
use crate::utils::errors::{map_unique_violation, AppError};

const USER_COLUMNS: &str = r#"
    id, name, email, password, role, is_verified, verification_token,
    reset_token, reset_token_expires, company_id, deleted, created_at, updated_at
"#;

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        verification_token: &str,
        company_id: Option<Uuid>,
    ) -> Result<User, AppError> {
        let query = format!(
            r#"
            INSERT INTO users (id, name, email, password, role, is_verified, verification_token, company_id)
            VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .bind(UserRole::User.as_str())
            .bind(verification_token)
            .bind(company_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "Email is already registered"))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let query = format!(
            "SELECT {} FROM users WHERE id = $1 AND deleted = FALSE",
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let query = format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1) AND deleted = FALSE",
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Indica si el email pertenece a una cuenta desactivada
    pub async fn deleted_email_exists(&self, email: &str) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) AND deleted = TRUE)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn verify_email(&self, token: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_verified = TRUE, verification_token = NULL, updated_at = NOW()
            WHERE verification_token = $1 AND deleted = FALSE
            "#,
        )
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_reset_token(
        &self,
        id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET reset_token = $2, reset_token_expires = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Cambia la contraseña si el token existe y no ha expirado
    pub async fn reset_password(&self, token: &str, password_hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password = $2, reset_token = NULL, reset_token_expires = NULL, updated_at = NOW()
            WHERE reset_token = $1 AND reset_token_expires > NOW() AND deleted = FALSE
            "#,
        )
        .bind(token)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        company_id: Option<Uuid>,
    ) -> Result<Option<User>, AppError> {
        let query = format!(
            r#"
            UPDATE users
            SET name = $2, company_id = $3, updated_at = NOW()
            WHERE id = $1 AND deleted = FALSE
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(name)
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn leave_company(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE users SET company_id = NULL, updated_at = NOW() WHERE id = $1 AND deleted = FALSE",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Borrado lógico; también desvincula al usuario de su empresa
    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET deleted = TRUE, company_id = NULL, updated_at = NOW()
            WHERE id = $1 AND deleted = FALSE
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_all(&self) -> Result<Vec<User>, AppError> {
        let query = format!(
            "SELECT {} FROM users WHERE deleted = FALSE ORDER BY created_at DESC",
            USER_COLUMNS
        );

        let users = sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    pub async fn admin_update(
        &self,
        id: Uuid,
        name: &str,
        role: UserRole,
        is_verified: bool,
    ) -> Result<Option<User>, AppError> {
        let query = format!(
            r#"
            UPDATE users
            SET name = $2, role = $3, is_verified = $4, updated_at = NOW()
            WHERE id = $1 AND deleted = FALSE
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(name)
            .bind(role.as_str())
            .bind(is_verified)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<User>, AppError> {
        let query = format!(
            "SELECT {} FROM users WHERE company_id = $1 AND deleted = FALSE ORDER BY name",
            USER_COLUMNS
        );

        let users = sqlx::query_as::<_, User>(&query)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    pub async fn find_in_company(
        &self,
        company_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<User>, AppError> {
        let query = format!(
            "SELECT {} FROM users WHERE id = $1 AND company_id = $2 AND deleted = FALSE",
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}
