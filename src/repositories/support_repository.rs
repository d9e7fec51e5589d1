use sqlx::PgPool;
use uuid::Uuid;

use crate::models::support_message::{
    SupportCategory, SupportMessage, SupportMessageWithUser, SupportStatus,
};
use crate::utils::errors::AppError;

const WITH_USER_SELECT: &str = r#"
    SELECT s.id, s.user_id, s.category, s.message, s.status, s.created_at,
           u.name AS user_name, u.email AS user_email
    FROM support_messages s
    JOIN users u ON u.id = s.user_id
"#;

pub struct SupportRepository {
    pool: PgPool,
}

impl SupportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        category: SupportCategory,
        message: &str,
    ) -> Result<SupportMessage, AppError> {
        let result = sqlx::query_as::<_, SupportMessage>(
            r#"
            INSERT INTO support_messages (id, user_id, category, message, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, category, message, status, deleted, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(category.as_str())
        .bind(message)
        .bind(SupportStatus::default().as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn list_all(&self) -> Result<Vec<SupportMessageWithUser>, AppError> {
        let query = format!(
            "{} WHERE s.deleted = FALSE ORDER BY s.created_at DESC",
            WITH_USER_SELECT
        );

        let result = sqlx::query_as::<_, SupportMessageWithUser>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SupportMessageWithUser>, AppError> {
        let query = format!("{} WHERE s.id = $1 AND s.deleted = FALSE", WITH_USER_SELECT);

        let result = sqlx::query_as::<_, SupportMessageWithUser>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: SupportStatus,
    ) -> Result<Option<SupportMessage>, AppError> {
        let result = sqlx::query_as::<_, SupportMessage>(
            r#"
            UPDATE support_messages SET status = $2
            WHERE id = $1 AND deleted = FALSE
            RETURNING id, user_id, category, message, status, deleted, created_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE support_messages SET deleted = TRUE WHERE id = $1 AND deleted = FALSE")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
