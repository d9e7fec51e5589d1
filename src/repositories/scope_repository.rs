use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::services::authorization_service::ScopeStore;
use crate::utils::errors::AppError;

/// Consultas de pertenencia usadas por la cadena de autorización
pub struct ScopeRepository {
    pool: PgPool,
}

impl ScopeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScopeStore for ScopeRepository {
    async fn user_company(&self, user_id: Uuid) -> Result<Option<Option<Uuid>>, AppError> {
        let row: Option<(Option<Uuid>,)> =
            sqlx::query_as("SELECT company_id FROM users WHERE id = $1 AND deleted = FALSE")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(company_id,)| company_id))
    }

    async fn is_company_owner(&self, company_id: Uuid, owner_id: Uuid) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM companies WHERE id = $1 AND created_by = $2 AND deleted = FALSE)",
        )
        .bind(company_id)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }
}
