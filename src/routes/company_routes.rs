use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, get},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::company_controller::CompanyController;
use crate::dto::ApiResponse;
use crate::middleware::{
    admin_only_middleware, admin_or_owner_middleware, auth_middleware, AuthenticatedUser,
};
use crate::models::company::{Company, CompanySummary, CompanyWithOwner, CreateCompanyRequest};
use crate::models::user::UserResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ValidatedJson;

type JsonResult<T> = Result<Json<ApiResponse<T>>, AppError>;

pub fn create_company_router(state: AppState) -> Router<AppState> {
    let authenticated = Router::new()
        .route("/companies/:company_id", get(get_company))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let owner = Router::new()
        .route("/companies", get(my_companies).post(create_company))
        .route("/companies/:company_id", delete(delete_company))
        .route("/companies/:company_id/employees", get(list_employees))
        .route("/companies/:company_id/employees/:user_id", get(get_employee))
        .route("/companies/:company_id/users/:user_id", delete(remove_employee))
        .route_layer(middleware::from_fn(admin_or_owner_middleware))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin = Router::new()
        .route("/admin/companies", get(admin_list_companies))
        .route(
            "/admin/companies/:company_id",
            get(admin_get_company).delete(delete_company),
        )
        .route("/admin/companies/:company_id/employees", get(list_employees))
        .route(
            "/admin/companies/:company_id/users/:user_id",
            delete(remove_employee),
        )
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    authenticated.merge(owner).merge(admin)
}

async fn create_company(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Company>>), AppError> {
    let company = CompanyController::new(&state).create(&user, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(company, "Company created")),
    ))
}

async fn my_companies(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> JsonResult<Vec<Company>> {
    let companies = CompanyController::new(&state).my_companies(&user).await?;
    Ok(Json(ApiResponse::success(companies)))
}

async fn get_company(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> JsonResult<CompanySummary> {
    let company = CompanyController::new(&state).summary(company_id).await?;
    Ok(Json(ApiResponse::success(company)))
}

async fn delete_company(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(company_id): Path<Uuid>,
) -> JsonResult<()> {
    CompanyController::new(&state).delete(&user, company_id).await?;
    Ok(Json(ApiResponse::message("Company deleted")))
}

async fn list_employees(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(company_id): Path<Uuid>,
) -> JsonResult<Vec<UserResponse>> {
    let employees = CompanyController::new(&state)
        .employees(&user, company_id)
        .await?;
    Ok(Json(ApiResponse::success(employees)))
}

async fn get_employee(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((company_id, user_id)): Path<(Uuid, Uuid)>,
) -> JsonResult<UserResponse> {
    let employee = CompanyController::new(&state)
        .employee(&user, company_id, user_id)
        .await?;
    Ok(Json(ApiResponse::success(employee)))
}

async fn remove_employee(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((company_id, user_id)): Path<(Uuid, Uuid)>,
) -> JsonResult<()> {
    CompanyController::new(&state)
        .remove_employee(&user, company_id, user_id)
        .await?;
    Ok(Json(ApiResponse::message("User removed from the company")))
}

async fn admin_list_companies(State(state): State<AppState>) -> JsonResult<Vec<CompanyWithOwner>> {
    let companies = CompanyController::new(&state).list_all().await?;
    Ok(Json(ApiResponse::success(companies)))
}

async fn admin_get_company(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> JsonResult<Company> {
    let company = CompanyController::new(&state).get(company_id).await?;
    Ok(Json(ApiResponse::success(company)))
}
