//! Modelo de TimeEntry
//!
//! Fichajes de entrada/salida. La duración se calcula al leer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// TimeEntry - mapea exactamente a la tabla time_entries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TimeEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
}

impl TimeEntry {
    /// Minutos trabajados; `None` mientras el fichaje sigue abierto
    pub fn duration_minutes(&self) -> Option<i64> {
        self.clock_out
            .map(|out| (out - self.clock_in).num_minutes().max(0))
    }
}

/// Response de fichaje con la duración derivada
#[derive(Debug, Clone, Serialize)]
pub struct TimeEntryResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
}

impl From<TimeEntry> for TimeEntryResponse {
    fn from(entry: TimeEntry) -> Self {
        Self {
            duration_minutes: entry.duration_minutes(),
            id: entry.id,
            user_id: entry.user_id,
            company_id: entry.company_id,
            clock_in: entry.clock_in,
            clock_out: entry.clock_out,
        }
    }
}

/// Query del historial mensual
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn entry(clock_out: Option<DateTime<Utc>>) -> TimeEntry {
        TimeEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            clock_in: Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap(),
            clock_out,
        }
    }

    #[test]
    fn test_open_entry_has_no_duration() {
        let open = entry(None);
        assert_eq!(open.duration_minutes(), None);
    }

    #[test]
    fn test_closed_entry_duration() {
        let clock_in = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();
        let closed = entry(Some(clock_in + Duration::minutes(495)));

        let response = TimeEntryResponse::from(closed);
        assert_eq!(response.duration_minutes, Some(495));
    }
}
