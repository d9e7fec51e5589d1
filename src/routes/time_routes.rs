use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::time_controller::TimeController;
use crate::dto::ApiResponse;
use crate::middleware::{
    admin_only_middleware, admin_or_owner_middleware, auth_middleware, AuthenticatedUser,
};
use crate::models::time_entry::{HistoryQuery, TimeEntryResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

type JsonResult<T> = Result<Json<ApiResponse<T>>, AppError>;

pub fn create_time_router(state: AppState) -> Router<AppState> {
    let user = Router::new()
        .route("/clock-in", post(clock_in))
        .route("/clock-out", post(clock_out))
        .route("/clock-today", get(clock_today))
        .route("/clock-history", get(clock_history))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let owner = Router::new()
        .route(
            "/companies/user/:user_id/clock-history",
            get(employee_clock_history),
        )
        .route_layer(middleware::from_fn(admin_or_owner_middleware))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin = Router::new()
        .route("/admin/clock-history/:user_id", get(admin_clock_history))
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    user.merge(owner).merge(admin)
}

async fn clock_in(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<(StatusCode, Json<ApiResponse<TimeEntryResponse>>), AppError> {
    let entry = TimeController::new(&state).clock_in(user.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(entry, "Clock-in recorded")),
    ))
}

async fn clock_out(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> JsonResult<TimeEntryResponse> {
    let entry = TimeController::new(&state).clock_out(user.user_id).await?;
    Ok(Json(ApiResponse::success_with_message(entry, "Clock-out recorded")))
}

async fn clock_today(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> JsonResult<TimeEntryResponse> {
    let entry = TimeController::new(&state).today(user.user_id).await?;
    Ok(Json(ApiResponse::success(entry)))
}

async fn clock_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<HistoryQuery>,
) -> JsonResult<Vec<TimeEntryResponse>> {
    let entries = TimeController::new(&state)
        .history(user.user_id, &query)
        .await?;
    Ok(Json(ApiResponse::success(entries)))
}

async fn employee_clock_history(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthenticatedUser>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> JsonResult<Vec<TimeEntryResponse>> {
    let entries = TimeController::new(&state)
        .employee_history(&requester, user_id, &query)
        .await?;
    Ok(Json(ApiResponse::success(entries)))
}

async fn admin_clock_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> JsonResult<Vec<TimeEntryResponse>> {
    let entries = TimeController::new(&state)
        .admin_history(user_id, &query)
        .await?;
    Ok(Json(ApiResponse::success(entries)))
}
