use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::controllers::auth_controller::AuthController;
use crate::dto::ApiResponse;
use crate::middleware::{admin_only_middleware, auth_middleware, AuthenticatedUser};
use crate::models::user::{
    AdminUpdateUserRequest, ChangePasswordRequest, ForgotPasswordRequest, ResetPasswordRequest,
    SigninRequest, SignupRequest, UpdateProfileRequest, UserResponse,
};
use crate::state::AppState;
use crate::utils::cookies::{clear_session_cookie, session_cookie};
use crate::utils::errors::AppError;
use crate::utils::extract::ValidatedJson;

type JsonResult<T> = Result<Json<ApiResponse<T>>, AppError>;

pub fn create_auth_router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/signin", post(signin))
        .route("/signup", post(signup))
        .route("/signout", post(signout))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password/:token", post(reset_password))
        .route("/verify/:token", get(verify_email));

    let authenticated = Router::new()
        .route(
            "/profile",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
        .route("/change-password", put(change_password))
        .route("/leave-company", put(leave_company))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin = Router::new()
        .route("/admin/users", get(admin_list_users))
        .route(
            "/admin/users/:user_id",
            get(admin_get_user)
                .put(admin_update_user)
                .delete(admin_delete_user),
        )
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(authenticated).merge(admin)
}

async fn signup(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), AppError> {
    let user = AuthController::new(&state).signup(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            user,
            "User registered. Check your email to verify your account.",
        )),
    ))
}

async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<SigninRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (user, token) = AuthController::new(&state).signin(request).await?;
    let cookie = session_cookie(token, state.config.jwt_expiration, state.config.cookie_secure);

    Ok((jar.add(cookie), Json(ApiResponse::success(user))))
}

async fn signout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    (
        jar.add(clear_session_cookie(state.config.cookie_secure)),
        Json(ApiResponse::message("Signed out")),
    )
}

async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ForgotPasswordRequest>,
) -> JsonResult<()> {
    AuthController::new(&state).forgot_password(request).await?;
    Ok(Json(ApiResponse::message(
        "We have sent you an email to reset your password.",
    )))
}

async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> JsonResult<()> {
    AuthController::new(&state)
        .reset_password(&token, request)
        .await?;
    Ok(Json(ApiResponse::message("Password updated successfully")))
}

async fn verify_email(State(state): State<AppState>, Path(token): Path<String>) -> JsonResult<()> {
    AuthController::new(&state).verify_email(&token).await?;
    Ok(Json(ApiResponse::message("Email verified successfully")))
}

async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> JsonResult<UserResponse> {
    let profile = AuthController::new(&state).profile(user.user_id).await?;
    Ok(Json(ApiResponse::success(profile)))
}

async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> JsonResult<UserResponse> {
    let profile = AuthController::new(&state)
        .update_profile(user.user_id, request)
        .await?;
    Ok(Json(ApiResponse::success_with_message(profile, "Profile updated")))
}

async fn delete_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    AuthController::new(&state).delete_profile(user.user_id).await?;
    Ok((
        jar.add(clear_session_cookie(state.config.cookie_secure)),
        Json(ApiResponse::message("Account deleted")),
    ))
}

async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> JsonResult<()> {
    AuthController::new(&state)
        .change_password(user.user_id, request)
        .await?;
    Ok(Json(ApiResponse::message("Password updated successfully")))
}

async fn leave_company(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> JsonResult<()> {
    AuthController::new(&state).leave_company(user.user_id).await?;
    Ok(Json(ApiResponse::message("You have left the company")))
}

async fn admin_list_users(State(state): State<AppState>) -> JsonResult<Vec<UserResponse>> {
    let users = AuthController::new(&state).list_users().await?;
    Ok(Json(ApiResponse::success(users)))
}

async fn admin_get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> JsonResult<UserResponse> {
    let user = AuthController::new(&state).get_user(user_id).await?;
    Ok(Json(ApiResponse::success(user)))
}

async fn admin_update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<AdminUpdateUserRequest>,
) -> JsonResult<UserResponse> {
    let user = AuthController::new(&state)
        .admin_update_user(user_id, request)
        .await?;
    Ok(Json(ApiResponse::success_with_message(user, "User updated")))
}

async fn admin_delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> JsonResult<()> {
    AuthController::new(&state).admin_delete_user(user_id).await?;
    Ok(Json(ApiResponse::message("User deleted")))
}
