use chrono::{DateTime, TimeZone, Utc};
use tracing::info;
use uuid::Uuid;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::time_entry::{HistoryQuery, TimeEntryResponse};
use crate::repositories::scope_repository::ScopeRepository;
use crate::repositories::time_entry_repository::{TimeEntryRepository, ACTIVE_CLOCK_IN};
use crate::repositories::user_repository::UserRepository;
use crate::services::AuthorizationService;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, not_found_error, AppError};
use crate::utils::validation::validate_month;

pub struct TimeController {
    entries: TimeEntryRepository,
    users: UserRepository,
    authorization: AuthorizationService<ScopeRepository>,
}

impl TimeController {
    pub fn new(state: &AppState) -> Self {
        Self {
            entries: TimeEntryRepository::new(state.pool.clone()),
            users: UserRepository::new(state.pool.clone()),
            authorization: AuthorizationService::new(ScopeRepository::new(state.pool.clone())),
        }
    }

    pub async fn clock_in(&self, user_id: Uuid) -> Result<TimeEntryResponse, AppError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| not_found_error("User"))?;

        let company_id = user
            .company_id
            .ok_or_else(|| bad_request_error("You are not part of any company."))?;

        if self.entries.find_open(user_id).await?.is_some() {
            return Err(AppError::BadRequest(ACTIVE_CLOCK_IN.to_string()));
        }

        let entry = self.entries.clock_in(user_id, company_id).await?;
        info!("⏱️ Fichaje de entrada: {}", user_id);
        Ok(entry.into())
    }

    pub async fn clock_out(&self, user_id: Uuid) -> Result<TimeEntryResponse, AppError> {
        let entry = self
            .entries
            .clock_out(user_id)
            .await?
            .ok_or_else(|| bad_request_error("No active clock-in found."))?;

        info!("⏱️ Fichaje de salida: {}", user_id);
        Ok(entry.into())
    }

    pub async fn today(&self, user_id: Uuid) -> Result<TimeEntryResponse, AppError> {
        self.entries
            .latest_today(user_id)
            .await?
            .map(TimeEntryResponse::from)
            .ok_or_else(|| AppError::NotFound("No clock-in recorded today".to_string()))
    }

    pub async fn history(
        &self,
        user_id: Uuid,
        query: &HistoryQuery,
    ) -> Result<Vec<TimeEntryResponse>, AppError> {
        let (from, to) = month_range(query)?;
        let entries = self.entries.history(user_id, from, to).await?;
        Ok(entries.into_iter().map(TimeEntryResponse::from).collect())
    }

    pub async fn employee_history(
        &self,
        requester: &AuthenticatedUser,
        user_id: Uuid,
        query: &HistoryQuery,
    ) -> Result<Vec<TimeEntryResponse>, AppError> {
        month_range(query)?;
        self.authorization.employee_company(requester, user_id).await?;
        self.history(user_id, query).await
    }

    pub async fn admin_history(
        &self,
        user_id: Uuid,
        query: &HistoryQuery,
    ) -> Result<Vec<TimeEntryResponse>, AppError> {
        month_range(query)?;
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| not_found_error("User"))?;
        self.history(user_id, query).await
    }
}

/// Intervalo `[inicio de mes, inicio del mes siguiente)` en UTC
pub fn month_range(query: &HistoryQuery) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let (Some(month), Some(year)) = (query.month, query.year) else {
        return Err(bad_request_error("month and year are required"));
    };

    validate_month(month)
        .map_err(|_| bad_request_error("month must be between 1 and 12"))?;

    let (next_year, next_month) = if month == 12 {
        let next_year = year
            .checked_add(1)
            .ok_or_else(|| bad_request_error("Invalid year"))?;
        (next_year, 1)
    } else {
        (year, month + 1)
    };

    let from = first_day(year, month)?;
    let to = first_day(next_year, next_month)?;
    Ok((from, to))
}

fn first_day(year: i32, month: u32) -> Result<DateTime<Utc>, AppError> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| bad_request_error("Invalid year"))
}
