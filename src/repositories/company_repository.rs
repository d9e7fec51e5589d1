use sqlx::PgPool;
use uuid::Uuid;

use crate::models::company::{Company, CompanyWithOwner};
use crate::utils::errors::{is_unique_violation, AppError};

pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Devuelve `None` si el `join_code` ya existe
    pub async fn create(
        &self,
        name: &str,
        created_by: Uuid,
        join_code: &str,
    ) -> Result<Option<Company>, AppError> {
        let result = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (id, name, created_by, join_code)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, created_by, join_code, deleted, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(created_by)
        .bind(join_code)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(company) => Ok(Some(company)),
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let result = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, created_by, join_code, deleted, created_at
            FROM companies
            WHERE id = $1 AND deleted = FALSE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn find_by_join_code(&self, join_code: &str) -> Result<Option<Company>, AppError> {
        let result = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, created_by, join_code, deleted, created_at
            FROM companies
            WHERE join_code = $1 AND deleted = FALSE
            "#,
        )
        .bind(join_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Company>, AppError> {
        let result = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, created_by, join_code, deleted, created_at
            FROM companies
            WHERE created_by = $1 AND deleted = FALSE
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn list_all_with_owner(&self) -> Result<Vec<CompanyWithOwner>, AppError> {
        let result = sqlx::query_as::<_, CompanyWithOwner>(
            r#"
            SELECT c.id, c.name, c.join_code, c.created_by, c.created_at,
                   u.name AS owner_name, u.email AS owner_email
            FROM companies c
            JOIN users u ON u.id = c.created_by
            WHERE c.deleted = FALSE
            ORDER BY c.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    /// Desvincula a los empleados y marca la empresa como borrada
    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE users SET company_id = NULL, updated_at = NOW() WHERE company_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("UPDATE companies SET deleted = TRUE WHERE id = $1 AND deleted = FALSE")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    pub async fn remove_employee(&self, company_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET company_id = NULL, updated_at = NOW()
            WHERE id = $1 AND company_id = $2 AND deleted = FALSE
            "#,
        )
        .bind(user_id)
        .bind(company_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
