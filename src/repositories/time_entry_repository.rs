use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::time_entry::TimeEntry;
use crate::utils::errors::{is_unique_violation, AppError};

pub const ACTIVE_CLOCK_IN: &str = "You already have an active clock-in.";

pub struct TimeEntryRepository {
    pool: PgPool,
}

impl TimeEntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_open(&self, user_id: Uuid) -> Result<Option<TimeEntry>, AppError> {
        let entry = sqlx::query_as::<_, TimeEntry>(
            r#"
            SELECT id, user_id, company_id, clock_in, clock_out
            FROM time_entries
            WHERE user_id = $1 AND clock_out IS NULL
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// El índice parcial sobre fichajes abiertos cubre la carrera entre
    /// dos clock-in simultáneos
    pub async fn clock_in(&self, user_id: Uuid, company_id: Uuid) -> Result<TimeEntry, AppError> {
        sqlx::query_as::<_, TimeEntry>(
            r#"
            INSERT INTO time_entries (id, user_id, company_id, clock_in)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, user_id, company_id, clock_in, clock_out
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(company_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::BadRequest(ACTIVE_CLOCK_IN.to_string())
            } else {
                AppError::Database(e)
            }
        })
    }

    pub async fn clock_out(&self, user_id: Uuid) -> Result<Option<TimeEntry>, AppError> {
        let entry = sqlx::query_as::<_, TimeEntry>(
            r#"
            UPDATE time_entries SET clock_out = NOW()
            WHERE user_id = $1 AND clock_out IS NULL
            RETURNING id, user_id, company_id, clock_in, clock_out
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Último fichaje iniciado hoy
    pub async fn latest_today(&self, user_id: Uuid) -> Result<Option<TimeEntry>, AppError> {
        let entry = sqlx::query_as::<_, TimeEntry>(
            r#"
            SELECT id, user_id, company_id, clock_in, clock_out
            FROM time_entries
            WHERE user_id = $1 AND DATE(clock_in) = CURRENT_DATE
            ORDER BY clock_in DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Fichajes con `clock_in` dentro de `[from, to)`, en orden cronológico
    pub async fn history(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>, AppError> {
        let entries = sqlx::query_as::<_, TimeEntry>(
            r#"
            SELECT id, user_id, company_id, clock_in, clock_out
            FROM time_entries
            WHERE user_id = $1 AND clock_in >= $2 AND clock_in < $3
            ORDER BY clock_in ASC
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
