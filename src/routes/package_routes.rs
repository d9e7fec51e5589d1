use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::package_controller::PackageController;
use crate::dto::ApiResponse;
use crate::middleware::{
    admin_only_middleware, admin_or_owner_middleware, auth_middleware, AuthenticatedUser,
};
use crate::models::package::{AdminUpdatePackageRequest, Package, PackageRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ValidatedJson;

type JsonResult<T> = Result<Json<ApiResponse<T>>, AppError>;
type CreatedResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), AppError>;

pub fn create_package_router(state: AppState) -> Router<AppState> {
    let user = Router::new()
        .route("/packages", get(list_packages).post(create_package))
        .route(
            "/packages/:id",
            get(get_package).put(update_package).delete(delete_package),
        )
        .route("/packages/:id/delivered", put(mark_delivered))
        .route("/packages/:id/unmark-delivered", put(unmark_delivered))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let owner = Router::new()
        .route("/companies/user/:user_id/packages", get(owner_list_packages))
        .route(
            "/companies/:company_id/users/:user_id/packages",
            post(owner_create_package),
        )
        .route(
            "/companies/:company_id/users/:user_id/packages/:package_id",
            get(owner_get_package)
                .put(owner_update_package)
                .delete(owner_delete_package),
        )
        .route_layer(middleware::from_fn(admin_or_owner_middleware))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin = Router::new()
        .route("/admin/packages", get(admin_list_packages))
        .route(
            "/admin/packages/:id",
            get(admin_get_package)
                .put(admin_update_package)
                .delete(admin_delete_package),
        )
        .route(
            "/admin/users/:user_id/packages",
            get(admin_list_user_packages).post(admin_create_user_package),
        )
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    user.merge(owner).merge(admin)
}

fn created(package: Package) -> (StatusCode, Json<ApiResponse<Package>>) {
    (
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(package, "Package created")),
    )
}

// --- Usuario ---

async fn list_packages(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> JsonResult<Vec<Package>> {
    let packages = PackageController::new(&state).list_mine(user.user_id).await?;
    Ok(Json(ApiResponse::success(packages)))
}

async fn create_package(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<PackageRequest>,
) -> CreatedResult<Package> {
    let package = PackageController::new(&state)
        .create_for(user.user_id, request)
        .await?;
    Ok(created(package))
}

async fn get_package(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> JsonResult<Package> {
    let package = PackageController::new(&state).get_mine(user.user_id, id).await?;
    Ok(Json(ApiResponse::success(package)))
}

async fn update_package(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<PackageRequest>,
) -> JsonResult<Package> {
    let package = PackageController::new(&state)
        .update_mine(user.user_id, id, request)
        .await?;
    Ok(Json(ApiResponse::success_with_message(package, "Package updated")))
}

async fn delete_package(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> JsonResult<()> {
    PackageController::new(&state).delete_mine(user.user_id, id).await?;
    Ok(Json(ApiResponse::message("Package deleted")))
}

async fn mark_delivered(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> JsonResult<Package> {
    let package = PackageController::new(&state)
        .set_delivered(user.user_id, id, true)
        .await?;
    Ok(Json(ApiResponse::success(package)))
}

async fn unmark_delivered(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> JsonResult<Package> {
    let package = PackageController::new(&state)
        .set_delivered(user.user_id, id, false)
        .await?;
    Ok(Json(ApiResponse::success(package)))
}

// --- Owner de empresa ---

async fn owner_list_packages(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthenticatedUser>,
    Path(user_id): Path<Uuid>,
) -> JsonResult<Vec<Package>> {
    let packages = PackageController::new(&state)
        .owner_list_for_employee(&requester, user_id)
        .await?;
    Ok(Json(ApiResponse::success(packages)))
}

async fn owner_create_package(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthenticatedUser>,
    Path((company_id, user_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(request): ValidatedJson<PackageRequest>,
) -> CreatedResult<Package> {
    let package = PackageController::new(&state)
        .owner_create(&requester, company_id, user_id, request)
        .await?;
    Ok(created(package))
}

async fn owner_get_package(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthenticatedUser>,
    Path((company_id, user_id, package_id)): Path<(Uuid, Uuid, Uuid)>,
) -> JsonResult<Package> {
    let package = PackageController::new(&state)
        .owner_get(&requester, company_id, user_id, package_id)
        .await?;
    Ok(Json(ApiResponse::success(package)))
}

async fn owner_update_package(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthenticatedUser>,
    Path((company_id, user_id, package_id)): Path<(Uuid, Uuid, Uuid)>,
    ValidatedJson(request): ValidatedJson<PackageRequest>,
) -> JsonResult<Package> {
    let package = PackageController::new(&state)
        .owner_update(&requester, company_id, user_id, package_id, request)
        .await?;
    Ok(Json(ApiResponse::success_with_message(package, "Package updated")))
}

async fn owner_delete_package(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthenticatedUser>,
    Path((company_id, user_id, package_id)): Path<(Uuid, Uuid, Uuid)>,
) -> JsonResult<()> {
    PackageController::new(&state)
        .owner_delete(&requester, company_id, user_id, package_id)
        .await?;
    Ok(Json(ApiResponse::message("Package deleted")))
}

// --- Administración ---

async fn admin_list_packages(State(state): State<AppState>) -> JsonResult<Vec<Package>> {
    let packages = PackageController::new(&state).list_all().await?;
    Ok(Json(ApiResponse::success(packages)))
}

async fn admin_get_package(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> JsonResult<Package> {
    let package = PackageController::new(&state).admin_get(id).await?;
    Ok(Json(ApiResponse::success(package)))
}

async fn admin_update_package(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<AdminUpdatePackageRequest>,
) -> JsonResult<Package> {
    let package = PackageController::new(&state).admin_update(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(package, "Package updated")))
}

async fn admin_delete_package(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> JsonResult<()> {
    PackageController::new(&state).admin_delete(id).await?;
    Ok(Json(ApiResponse::message("Package deleted")))
}

async fn admin_list_user_packages(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> JsonResult<Vec<Package>> {
    let packages = PackageController::new(&state)
        .admin_list_for_user(user_id)
        .await?;
    Ok(Json(ApiResponse::success(packages)))
}

async fn admin_create_user_package(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<PackageRequest>,
) -> CreatedResult<Package> {
    let package = PackageController::new(&state)
        .admin_create_for_user(user_id, request)
        .await?;
    Ok(created(package))
}
