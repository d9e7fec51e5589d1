use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, patch, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::route_controller::RouteController;
use crate::dto::navigation_dto::{NavigationQuery, NavigationResponse};
use crate::dto::ApiResponse;
use crate::middleware::{
    admin_only_middleware, admin_or_owner_middleware, auth_middleware, AuthenticatedUser,
};
use crate::models::route::{
    Route, RouteCreatedResponse, RouteDetail, RouteNameResponse, RoutePackage, RouteRequest,
    RouteStatusRequest, RouteWithUser,
};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ValidatedJson;

type JsonResult<T> = Result<Json<ApiResponse<T>>, AppError>;
type CreatedResult = Result<(StatusCode, Json<ApiResponse<RouteCreatedResponse>>), AppError>;

pub fn create_route_router(state: AppState) -> Router<AppState> {
    let user = Router::new()
        .route("/routes", get(list_routes).post(create_route))
        .route(
            "/routes/:id",
            get(get_route).put(update_route).delete(delete_route),
        )
        .route("/routes/:id/packages", get(route_packages))
        .route("/routes/:id/status", patch(update_route_status))
        .route("/routes/:id/name", get(route_name))
        .route("/routes/:id/navigation", get(route_navigation))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let owner = Router::new()
        .route("/companies/user/:user_id/routes", get(owner_list_routes))
        .route(
            "/companies/:company_id/users/:user_id/routes",
            post(owner_create_route),
        )
        .route(
            "/companies/:company_id/users/:user_id/routes/:route_id",
            get(owner_get_route)
                .put(owner_update_route)
                .delete(owner_delete_route),
        )
        .route(
            "/companies/:company_id/users/:user_id/routes/:route_id/packages",
            get(owner_route_packages),
        )
        .route_layer(middleware::from_fn(admin_or_owner_middleware))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin = Router::new()
        .route("/admin/routes", get(admin_list_routes))
        .route(
            "/admin/routes/:id",
            get(admin_get_route)
                .put(admin_update_route_status)
                .delete(admin_delete_route),
        )
        .route("/admin/routes/:id/packages", get(admin_route_packages))
        .route("/admin/routes-ad/:id", put(admin_update_route))
        .route(
            "/admin/users/:user_id/routes",
            get(admin_list_user_routes).post(admin_create_user_route),
        )
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    user.merge(owner).merge(admin)
}

fn created(route: Route) -> (StatusCode, Json<ApiResponse<RouteCreatedResponse>>) {
    (
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            RouteCreatedResponse { route_id: route.id },
            "Route created",
        )),
    )
}

// --- Usuario ---

async fn list_routes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> JsonResult<Vec<Route>> {
    let routes = RouteController::new(&state).list_mine(user.user_id).await?;
    Ok(Json(ApiResponse::success(routes)))
}

async fn create_route(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<RouteRequest>,
) -> CreatedResult {
    let route = RouteController::new(&state)
        .create_mine(user.user_id, request)
        .await?;
    Ok(created(route))
}

async fn get_route(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> JsonResult<RouteDetail> {
    let route = RouteController::new(&state).get_mine(user.user_id, id).await?;
    Ok(Json(ApiResponse::success(route)))
}

async fn update_route(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<RouteRequest>,
) -> JsonResult<Route> {
    let route = RouteController::new(&state)
        .update_mine(user.user_id, id, request)
        .await?;
    Ok(Json(ApiResponse::success_with_message(route, "Route updated")))
}

async fn delete_route(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> JsonResult<()> {
    RouteController::new(&state).delete_mine(user.user_id, id).await?;
    Ok(Json(ApiResponse::message("Route deleted")))
}

async fn route_packages(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> JsonResult<Vec<RoutePackage>> {
    let packages = RouteController::new(&state)
        .packages_mine(user.user_id, id)
        .await?;
    Ok(Json(ApiResponse::success(packages)))
}

async fn update_route_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<RouteStatusRequest>,
) -> JsonResult<Route> {
    let route = RouteController::new(&state)
        .update_status_mine(user.user_id, id, request)
        .await?;
    Ok(Json(ApiResponse::success_with_message(route, "Route status updated")))
}

async fn route_name(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> JsonResult<RouteNameResponse> {
    let name = RouteController::new(&state).name_mine(user.user_id, id).await?;
    Ok(Json(ApiResponse::success(name)))
}

async fn route_navigation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<NavigationQuery>,
) -> JsonResult<NavigationResponse> {
    let navigation = RouteController::new(&state)
        .navigation(user.user_id, id, query)
        .await?;
    Ok(Json(ApiResponse::success(navigation)))
}

// --- Owner de empresa ---

async fn owner_list_routes(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthenticatedUser>,
    Path(user_id): Path<Uuid>,
) -> JsonResult<Vec<Route>> {
    let routes = RouteController::new(&state)
        .owner_list_for_employee(&requester, user_id)
        .await?;
    Ok(Json(ApiResponse::success(routes)))
}

async fn owner_create_route(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthenticatedUser>,
    Path((company_id, user_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(request): ValidatedJson<RouteRequest>,
) -> CreatedResult {
    let route = RouteController::new(&state)
        .owner_create(&requester, company_id, user_id, request)
        .await?;
    Ok(created(route))
}

async fn owner_get_route(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthenticatedUser>,
    Path((company_id, user_id, route_id)): Path<(Uuid, Uuid, Uuid)>,
) -> JsonResult<RouteDetail> {
    let route = RouteController::new(&state)
        .owner_get(&requester, company_id, user_id, route_id)
        .await?;
    Ok(Json(ApiResponse::success(route)))
}

async fn owner_update_route(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthenticatedUser>,
    Path((company_id, user_id, route_id)): Path<(Uuid, Uuid, Uuid)>,
    ValidatedJson(request): ValidatedJson<RouteRequest>,
) -> JsonResult<Route> {
    let route = RouteController::new(&state)
        .owner_update(&requester, company_id, user_id, route_id, request)
        .await?;
    Ok(Json(ApiResponse::success_with_message(route, "Route updated")))
}

async fn owner_delete_route(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthenticatedUser>,
    Path((company_id, user_id, route_id)): Path<(Uuid, Uuid, Uuid)>,
) -> JsonResult<()> {
    RouteController::new(&state)
        .owner_delete(&requester, company_id, user_id, route_id)
        .await?;
    Ok(Json(ApiResponse::message("Route deleted")))
}

async fn owner_route_packages(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthenticatedUser>,
    Path((company_id, user_id, route_id)): Path<(Uuid, Uuid, Uuid)>,
) -> JsonResult<Vec<RoutePackage>> {
    let packages = RouteController::new(&state)
        .owner_packages(&requester, company_id, user_id, route_id)
        .await?;
    Ok(Json(ApiResponse::success(packages)))
}

// --- Administración ---

async fn admin_list_routes(State(state): State<AppState>) -> JsonResult<Vec<RouteWithUser>> {
    let routes = RouteController::new(&state).list_all().await?;
    Ok(Json(ApiResponse::success(routes)))
}

async fn admin_get_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> JsonResult<RouteDetail> {
    let route = RouteController::new(&state).admin_get(id).await?;
    Ok(Json(ApiResponse::success(route)))
}

async fn admin_update_route_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<RouteStatusRequest>,
) -> JsonResult<Route> {
    let route = RouteController::new(&state)
        .admin_update_status(id, request)
        .await?;
    Ok(Json(ApiResponse::success_with_message(route, "Route status updated")))
}

async fn admin_update_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<RouteRequest>,
) -> JsonResult<Route> {
    let route = RouteController::new(&state).admin_update(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(route, "Route updated")))
}

async fn admin_delete_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> JsonResult<()> {
    RouteController::new(&state).admin_delete(id).await?;
    Ok(Json(ApiResponse::message("Route deleted")))
}

async fn admin_route_packages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> JsonResult<Vec<RoutePackage>> {
    let packages = RouteController::new(&state).admin_packages(id).await?;
    Ok(Json(ApiResponse::success(packages)))
}

async fn admin_list_user_routes(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> JsonResult<Vec<Route>> {
    let routes = RouteController::new(&state)
        .admin_list_for_user(user_id)
        .await?;
    Ok(Json(ApiResponse::success(routes)))
}

async fn admin_create_user_route(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<RouteRequest>,
) -> CreatedResult {
    let route = RouteController::new(&state)
        .admin_create_for_user(user_id, request)
        .await?;
    Ok(created(route))
}
