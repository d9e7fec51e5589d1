//! Tests contra PostgreSQL real
//!
//! Cada test recibe una base de datos nueva con las migraciones aplicadas.
//! Necesitan `DATABASE_URL`: `cargo test --test db_tests -- --ignored`

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use fastroute_backend::config::EnvironmentConfig;
use fastroute_backend::controllers::auth_controller::AuthController;
use fastroute_backend::controllers::company_controller::CompanyController;
use fastroute_backend::controllers::package_controller::PackageController;
use fastroute_backend::controllers::route_controller::RouteController;
use fastroute_backend::controllers::time_controller::TimeController;
use fastroute_backend::middleware::AuthenticatedUser;
use fastroute_backend::models::company::{Company, CreateCompanyRequest};
use fastroute_backend::models::package::{AdminUpdatePackageRequest, Package, PackageRequest};
use fastroute_backend::models::route::{Route, RouteRequest};
use fastroute_backend::models::user::{SignupRequest, UserResponse, UserRole};
use fastroute_backend::services::{Coordinates, Geocoder};
use fastroute_backend::state::AppState;
use fastroute_backend::utils::errors::AppError;
use fastroute_backend::utils::jwt::{generate_token, JwtConfig};

const TEST_SECRET: &str = "db-test-secret";

/// Geocodificador fijo en la Puerta del Sol
struct FixedGeocoder;

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn geocode(&self, _address: &str) -> anyhow::Result<Option<Coordinates>> {
        Ok(Some(Coordinates {
            latitude: 40.4169,
            longitude: -3.7035,
        }))
    }
}

fn test_config() -> EnvironmentConfig {
    EnvironmentConfig::with_defaults("postgres://unused", TEST_SECRET)
}

fn state(pool: PgPool) -> AppState {
    AppState::new(pool, test_config())
        .unwrap()
        .with_geocoder(Arc::new(FixedGeocoder))
}

fn as_owner(user: &UserResponse) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: user.id,
        role: UserRole::Owner,
    }
}

async fn signup(state: &AppState, email: &str, company_code: Option<&str>) -> UserResponse {
    AuthController::new(state)
        .signup(SignupRequest {
            name: email.split('@').next().unwrap_or("user").to_string(),
            email: email.to_string(),
            password: "secret123".to_string(),
            company_code: company_code.map(str::to_string),
        })
        .await
        .unwrap()
}

async fn company(state: &AppState, owner: &UserResponse) -> Company {
    CompanyController::new(state)
        .create(
            &as_owner(owner),
            CreateCompanyRequest {
                name: "Repartos Sol".to_string(),
            },
        )
        .await
        .unwrap()
}

async fn package(state: &AppState, user_id: Uuid, name: &str) -> Package {
    PackageController::new(state)
        .create_for(user_id, package_request(name))
        .await
        .unwrap()
}

fn package_request(name: &str) -> PackageRequest {
    PackageRequest {
        name: name.to_string(),
        description: None,
        priority: 5,
        destination_address: "Puerta del Sol 1, Madrid".to_string(),
    }
}

fn route_request(name: &str, package_ids: Vec<Uuid>) -> RouteRequest {
    RouteRequest {
        name: name.to_string(),
        status: None,
        package_ids,
    }
}

async fn route(state: &AppState, user_id: Uuid, package_ids: Vec<Uuid>) -> Route {
    RouteController::new(state)
        .create_mine(user_id, route_request("Ruta centro", package_ids))
        .await
        .unwrap()
}

async fn route_package_ids(state: &AppState, user_id: Uuid, route_id: Uuid) -> HashSet<Uuid> {
    RouteController::new(state)
        .packages_mine(user_id, route_id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_signup_with_join_code_sets_company(pool: PgPool) {
    let state = state(pool);
    let owner = signup(&state, "owner@fastroute.app", None).await;
    let company = company(&state, &owner).await;

    let employee = signup(&state, "ana@fastroute.app", Some(&company.join_code)).await;
    assert_eq!(employee.company_id, Some(company.id));

    let employees = CompanyController::new(&state)
        .employees(&as_owner(&owner), company.id)
        .await
        .unwrap();
    assert!(employees.iter().any(|u| u.id == employee.id));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_route_update_replaces_package_set(pool: PgPool) {
    let state = state(pool);
    let user = signup(&state, "ana@fastroute.app", None).await;
    let a = package(&state, user.id, "Caja A").await;
    let b = package(&state, user.id, "Caja B").await;
    let c = package(&state, user.id, "Caja C").await;

    let route = route(&state, user.id, vec![a.id, b.id]).await;
    assert_eq!(
        route_package_ids(&state, user.id, route.id).await,
        HashSet::from([a.id, b.id])
    );

    RouteController::new(&state)
        .update_mine(user.id, route.id, route_request("Ruta centro", vec![b.id, c.id, c.id]))
        .await
        .unwrap();

    assert_eq!(
        route_package_ids(&state, user.id, route.id).await,
        HashSet::from([b.id, c.id])
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_route_update_with_foreign_package_changes_nothing(pool: PgPool) {
    let state = state(pool);
    let user = signup(&state, "ana@fastroute.app", None).await;
    let other = signup(&state, "luis@fastroute.app", None).await;
    let mine = package(&state, user.id, "Caja A").await;
    let foreign = package(&state, other.id, "Caja B").await;

    let route = route(&state, user.id, vec![mine.id]).await;

    let result = RouteController::new(&state)
        .update_mine(user.id, route.id, route_request("Otra", vec![foreign.id]))
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let detail = RouteController::new(&state)
        .get_mine(user.id, route.id)
        .await
        .unwrap();
    assert_eq!(detail.route.name, "Ruta centro");
    assert_eq!(
        route_package_ids(&state, user.id, route.id).await,
        HashSet::from([mine.id])
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_clock_in_twice_keeps_single_entry(pool: PgPool) {
    let state = state(pool.clone());
    let owner = signup(&state, "owner@fastroute.app", None).await;
    let company = company(&state, &owner).await;
    let employee = signup(&state, "ana@fastroute.app", Some(&company.join_code)).await;

    let controller = TimeController::new(&state);
    controller.clock_in(employee.id).await.unwrap();

    let second = controller.clock_in(employee.id).await;
    assert!(matches!(second, Err(AppError::BadRequest(_))));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM time_entries WHERE user_id = $1")
        .bind(employee.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let closed = controller.clock_out(employee.id).await.unwrap();
    assert!(closed.clock_out.is_some());
    assert!(matches!(
        controller.clock_out(employee.id).await,
        Err(AppError::BadRequest(_))
    ));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_soft_deleted_package_is_hidden(pool: PgPool) {
    let state = state(pool);
    let user = signup(&state, "ana@fastroute.app", None).await;
    let kept = package(&state, user.id, "Caja A").await;
    let removed = package(&state, user.id, "Caja B").await;
    let route = route(&state, user.id, vec![kept.id, removed.id]).await;

    let controller = PackageController::new(&state);
    controller.delete_mine(user.id, removed.id).await.unwrap();

    let listed: Vec<Uuid> = controller.list_mine(user.id).await.unwrap().iter().map(|p| p.id).collect();
    assert_eq!(listed, vec![kept.id]);
    assert!(!controller.list_all().await.unwrap().iter().any(|p| p.id == removed.id));
    assert!(matches!(
        controller.get_mine(user.id, removed.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        controller.delete_mine(user.id, removed.id).await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(
        route_package_ids(&state, user.id, route.id).await,
        HashSet::from([kept.id])
    );

    // El nombre queda libre tras el borrado
    package(&state, user.id, "Caja B").await;
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_soft_deleted_company_is_hidden(pool: PgPool) {
    let state = state(pool);
    let owner = signup(&state, "owner@fastroute.app", None).await;
    let company = company(&state, &owner).await;

    let controller = CompanyController::new(&state);
    controller.delete(&as_owner(&owner), company.id).await.unwrap();

    assert!(matches!(controller.get(company.id).await, Err(AppError::NotFound(_))));
    assert!(controller.my_companies(&as_owner(&owner)).await.unwrap().is_empty());
    assert!(!controller.list_all().await.unwrap().iter().any(|c| c.id == company.id));

    // El código de una empresa borrada ya no sirve para unirse
    let result = AuthController::new(&state)
        .signup(SignupRequest {
            name: "Ana".to_string(),
            email: "ana@fastroute.app".to_string(),
            password: "secret123".to_string(),
            company_code: Some(company.join_code.clone()),
        })
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_soft_deleted_user_is_hidden(pool: PgPool) {
    let state = state(pool);
    let user = signup(&state, "ana@fastroute.app", None).await;

    let controller = AuthController::new(&state);
    controller.admin_delete_user(user.id).await.unwrap();

    assert!(matches!(controller.get_user(user.id).await, Err(AppError::NotFound(_))));
    assert!(!controller.list_users().await.unwrap().iter().any(|u| u.id == user.id));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_mark_delivered_is_idempotent(pool: PgPool) {
    let state = state(pool);
    let user = signup(&state, "ana@fastroute.app", None).await;
    let package = package(&state, user.id, "Caja A").await;
    let controller = PackageController::new(&state);

    for _ in 0..2 {
        let updated = controller.set_delivered(user.id, package.id, true).await.unwrap();
        assert!(updated.delivered);
    }
    for _ in 0..2 {
        let updated = controller.set_delivered(user.id, package.id, false).await.unwrap();
        assert!(!updated.delivered);
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_package_names_are_unique_per_user(pool: PgPool) {
    let state = state(pool);
    let ana = signup(&state, "ana@fastroute.app", None).await;
    let luis = signup(&state, "luis@fastroute.app", None).await;

    package(&state, ana.id, "Caja 1").await;
    package(&state, luis.id, "Caja 1").await;

    let duplicate = PackageController::new(&state)
        .create_for(ana.id, package_request("Caja 1"))
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_reassigned_package_leaves_previous_routes(pool: PgPool) {
    let state = state(pool);
    let ana = signup(&state, "ana@fastroute.app", None).await;
    let luis = signup(&state, "luis@fastroute.app", None).await;
    let moved = package(&state, ana.id, "Caja A").await;
    let stays = package(&state, ana.id, "Caja B").await;
    let route = route(&state, ana.id, vec![moved.id, stays.id]).await;

    let updated = PackageController::new(&state)
        .admin_update(
            moved.id,
            AdminUpdatePackageRequest {
                package: package_request("Caja A"),
                user_id: Some(luis.id),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.user_id, luis.id);

    assert_eq!(
        route_package_ids(&state, ana.id, route.id).await,
        HashSet::from([stays.id])
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_owner_listing_drops_deleted_employee_package(pool: PgPool) {
    let state = state(pool);
    let owner = signup(&state, "owner@fastroute.app", None).await;
    let company = company(&state, &owner).await;
    let employee = signup(&state, "ana@fastroute.app", Some(&company.join_code)).await;
    let package = package(&state, employee.id, "Caja A").await;

    PackageController::new(&state)
        .delete_mine(employee.id, package.id)
        .await
        .unwrap();

    let token = generate_token(owner.id, UserRole::Owner, &JwtConfig::from(&test_config())).unwrap();
    let request = Request::builder()
        .method(Method::GET)
        .uri(format!("/api/companies/user/{}/packages", employee.id))
        .header(header::COOKIE, format!("token={}", token))
        .body(Body::empty())
        .unwrap();

    let response = fastroute_backend::create_app(state)
        .oneshot(request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["data"], Value::Array(vec![]));
}
