use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::support_controller::SupportController;
use crate::dto::ApiResponse;
use crate::middleware::{admin_only_middleware, auth_middleware, AuthenticatedUser};
use crate::models::support_message::{
    CreateSupportRequest, SupportMessage, SupportMessageWithUser, UpdateSupportStatusRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ValidatedJson;

type JsonResult<T> = Result<Json<ApiResponse<T>>, AppError>;

pub fn create_support_router(state: AppState) -> Router<AppState> {
    let user = Router::new()
        .route("/support", post(create_message))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin = Router::new()
        .route("/admin/support", get(list_messages))
        .route(
            "/admin/support/:id",
            get(get_message).put(update_message_status).delete(delete_message),
        )
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    user.merge(admin)
}

async fn create_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateSupportRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SupportMessage>>), AppError> {
    let message = SupportController::new(&state)
        .create(user.user_id, request)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            message,
            "Support message sent",
        )),
    ))
}

async fn list_messages(State(state): State<AppState>) -> JsonResult<Vec<SupportMessageWithUser>> {
    let messages = SupportController::new(&state).list_all().await?;
    Ok(Json(ApiResponse::success(messages)))
}

async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> JsonResult<SupportMessageWithUser> {
    let message = SupportController::new(&state).get(id).await?;
    Ok(Json(ApiResponse::success(message)))
}

async fn update_message_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateSupportStatusRequest>,
) -> JsonResult<SupportMessage> {
    let message = SupportController::new(&state)
        .update_status(id, request)
        .await?;
    Ok(Json(ApiResponse::success_with_message(message, "Status updated")))
}

async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> JsonResult<()> {
    SupportController::new(&state).delete(id).await?;
    Ok(Json(ApiResponse::message("Support message deleted")))
}
