//! Rutas de la API
//!
//! Cada módulo agrupa sus rutas por nivel de acceso (público, autenticado,
//! owner y admin) y se combinan bajo `/api`.

pub mod auth_routes;
pub mod company_routes;
pub mod health_routes;
pub mod package_routes;
pub mod route_routes;
pub mod support_routes;
pub mod time_routes;

use axum::Router;

use crate::state::AppState;

pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(health_routes::create_health_router())
        .merge(auth_routes::create_auth_router(state.clone()))
        .merge(company_routes::create_company_router(state.clone()))
        .merge(package_routes::create_package_router(state.clone()))
        .merge(route_routes::create_route_router(state.clone()))
        .merge(time_routes::create_time_router(state.clone()))
        .merge(support_routes::create_support_router(state))
}
