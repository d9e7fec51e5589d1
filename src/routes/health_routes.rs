use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_health_router() -> Router<AppState> {
    Router::new().route("/ping", get(ping))
}

/// Ida y vuelta a la base de datos
async fn ping(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let (now,): (DateTime<Utc>,) = sqlx::query_as("SELECT NOW()")
        .fetch_one(&state.pool)
        .await?;

    Ok(Json(json!({
        "status": "ok",
        "database_time": now.to_rfc3339(),
    })))
}

/// Endpoint raíz
pub async fn welcome() -> Json<Value> {
    Json(json!({
        "message": "FastRoute API is running",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
