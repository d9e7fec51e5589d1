use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::navigation_dto::{NavigationQuery, NavigationResponse};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::route::{
    Route, RouteDetail, RouteNameResponse, RoutePackage, RouteRequest, RouteStatus,
    RouteStatusRequest, RouteWithUser,
};
use crate::repositories::route_repository::RouteRepository;
use crate::repositories::scope_repository::ScopeRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::navigation_service::{
    build_navigation, ensure_routable, origin_from_query, stop_coordinates,
};
use crate::services::{AuthorizationService, RouteOptimizer};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, not_found_error, AppError};
use crate::utils::validation::dedupe_ids;

pub struct RouteController {
    routes: RouteRepository,
    users: UserRepository,
    optimizer: Arc<dyn RouteOptimizer>,
    authorization: AuthorizationService<ScopeRepository>,
}

impl RouteController {
    pub fn new(state: &AppState) -> Self {
        Self {
            routes: RouteRepository::new(state.pool.clone()),
            users: UserRepository::new(state.pool.clone()),
            optimizer: state.optimizer.clone(),
            authorization: AuthorizationService::new(ScopeRepository::new(state.pool.clone())),
        }
    }

    // --- Usuario ---

    pub async fn list_mine(&self, user_id: Uuid) -> Result<Vec<Route>, AppError> {
        self.routes.list_by_user(user_id).await
    }

    pub async fn create_mine(&self, user_id: Uuid, request: RouteRequest) -> Result<Route, AppError> {
        if request.package_ids.is_empty() {
            return Err(bad_request_error("A route needs at least one package"));
        }
        self.create_for(user_id, request).await
    }

    pub async fn get_mine(&self, user_id: Uuid, route_id: Uuid) -> Result<RouteDetail, AppError> {
        self.detail(route_id, Some(user_id)).await
    }

    pub async fn update_mine(
        &self,
        user_id: Uuid,
        route_id: Uuid,
        request: RouteRequest,
    ) -> Result<Route, AppError> {
        self.update_scoped(route_id, Some(user_id), request).await
    }

    pub async fn delete_mine(&self, user_id: Uuid, route_id: Uuid) -> Result<(), AppError> {
        self.delete_scoped(route_id, Some(user_id)).await
    }

    pub async fn packages_mine(
        &self,
        user_id: Uuid,
        route_id: Uuid,
    ) -> Result<Vec<RoutePackage>, AppError> {
        self.packages_scoped(route_id, Some(user_id)).await
    }

    pub async fn update_status_mine(
        &self,
        user_id: Uuid,
        route_id: Uuid,
        request: RouteStatusRequest,
    ) -> Result<Route, AppError> {
        self.update_status_scoped(route_id, Some(user_id), request).await
    }

    pub async fn name_mine(&self, user_id: Uuid, route_id: Uuid) -> Result<RouteNameResponse, AppError> {
        let route = self.find(route_id, Some(user_id)).await?;
        Ok(RouteNameResponse {
            id: route.id,
            name: route.name,
        })
    }

    /// Ordena las paradas de la ruta desde la posición actual
    pub async fn navigation(
        &self,
        user_id: Uuid,
        route_id: Uuid,
        query: NavigationQuery,
    ) -> Result<NavigationResponse, AppError> {
        let route = self.find(route_id, Some(user_id)).await?;
        let packages = self.routes.packages(route.id).await?;
        ensure_routable(&packages)?;

        let origin = origin_from_query(&query);
        let trip = self
            .optimizer
            .optimize(origin, &stop_coordinates(&packages))
            .await
            .map_err(|e| {
                warn!("⚠️ Error optimizando la ruta {}: {}", route.id, e);
                AppError::ExternalApi("Route optimization is currently unavailable".to_string())
            })?;

        Ok(build_navigation(route.id, origin, &packages, &trip))
    }

    // --- Administración ---

    pub async fn list_all(&self) -> Result<Vec<RouteWithUser>, AppError> {
        self.routes.list_all_with_user().await
    }

    pub async fn admin_get(&self, route_id: Uuid) -> Result<RouteDetail, AppError> {
        self.detail(route_id, None).await
    }

    pub async fn admin_update(&self, route_id: Uuid, request: RouteRequest) -> Result<Route, AppError> {
        self.update_scoped(route_id, None, request).await
    }

    pub async fn admin_update_status(
        &self,
        route_id: Uuid,
        request: RouteStatusRequest,
    ) -> Result<Route, AppError> {
        self.update_status_scoped(route_id, None, request).await
    }

    pub async fn admin_delete(&self, route_id: Uuid) -> Result<(), AppError> {
        self.delete_scoped(route_id, None).await
    }

    pub async fn admin_packages(&self, route_id: Uuid) -> Result<Vec<RoutePackage>, AppError> {
        self.packages_scoped(route_id, None).await
    }

    pub async fn admin_list_for_user(&self, user_id: Uuid) -> Result<Vec<Route>, AppError> {
        self.ensure_user_exists(user_id).await?;
        self.routes.list_by_user(user_id).await
    }

    pub async fn admin_create_for_user(
        &self,
        user_id: Uuid,
        request: RouteRequest,
    ) -> Result<Route, AppError> {
        self.ensure_user_exists(user_id).await?;
        self.create_for(user_id, request).await
    }

    // --- Owner de empresa ---

    pub async fn owner_list_for_employee(
        &self,
        requester: &AuthenticatedUser,
        user_id: Uuid,
    ) -> Result<Vec<Route>, AppError> {
        self.authorization.employee_company(requester, user_id).await?;
        self.routes.list_by_user(user_id).await
    }

    pub async fn owner_create(
        &self,
        requester: &AuthenticatedUser,
        company_id: Uuid,
        user_id: Uuid,
        request: RouteRequest,
    ) -> Result<Route, AppError> {
        self.authorization
            .ensure_employee_of(requester, company_id, user_id)
            .await?;
        self.create_for(user_id, request).await
    }

    pub async fn owner_get(
        &self,
        requester: &AuthenticatedUser,
        company_id: Uuid,
        user_id: Uuid,
        route_id: Uuid,
    ) -> Result<RouteDetail, AppError> {
        self.authorization
            .ensure_employee_of(requester, company_id, user_id)
            .await?;
        self.detail(route_id, Some(user_id)).await
    }

    pub async fn owner_update(
        &self,
        requester: &AuthenticatedUser,
        company_id: Uuid,
        user_id: Uuid,
        route_id: Uuid,
        request: RouteRequest,
    ) -> Result<Route, AppError> {
        self.authorization
            .ensure_employee_of(requester, company_id, user_id)
            .await?;
        self.update_scoped(route_id, Some(user_id), request).await
    }

    pub async fn owner_delete(
        &self,
        requester: &AuthenticatedUser,
        company_id: Uuid,
        user_id: Uuid,
        route_id: Uuid,
    ) -> Result<(), AppError> {
        self.authorization
            .ensure_employee_of(requester, company_id, user_id)
            .await?;
        self.delete_scoped(route_id, Some(user_id)).await
    }

    pub async fn owner_packages(
        &self,
        requester: &AuthenticatedUser,
        company_id: Uuid,
        user_id: Uuid,
        route_id: Uuid,
    ) -> Result<Vec<RoutePackage>, AppError> {
        self.authorization
            .ensure_employee_of(requester, company_id, user_id)
            .await?;
        self.packages_scoped(route_id, Some(user_id)).await
    }

    // --- Internos ---

    async fn find(&self, route_id: Uuid, owner: Option<Uuid>) -> Result<Route, AppError> {
        self.routes
            .find(route_id, owner)
            .await?
            .ok_or_else(|| not_found_error("Route"))
    }

    async fn detail(&self, route_id: Uuid, owner: Option<Uuid>) -> Result<RouteDetail, AppError> {
        let route = self.find(route_id, owner).await?;
        let packages = self.routes.packages(route.id).await?;
        Ok(RouteDetail { route, packages })
    }

    async fn create_for(&self, user_id: Uuid, request: RouteRequest) -> Result<Route, AppError> {
        let status = parse_optional_status(request.status.as_deref())?.unwrap_or_default();
        let package_ids = dedupe_ids(&request.package_ids);

        let route = self
            .routes
            .create(user_id, request.name.trim(), status, &package_ids)
            .await?;

        info!(
            "🗺️ Ruta creada: {} para {} con {} paquetes",
            route.id,
            user_id,
            package_ids.len()
        );
        Ok(route)
    }

    async fn update_scoped(
        &self,
        route_id: Uuid,
        owner: Option<Uuid>,
        request: RouteRequest,
    ) -> Result<Route, AppError> {
        let status = parse_optional_status(request.status.as_deref())?;
        let route = self.find(route_id, owner).await?;
        let package_ids = dedupe_ids(&request.package_ids);

        self.routes
            .update(&route, request.name.trim(), status, &package_ids)
            .await
    }

    async fn update_status_scoped(
        &self,
        route_id: Uuid,
        owner: Option<Uuid>,
        request: RouteStatusRequest,
    ) -> Result<Route, AppError> {
        let status = RouteStatus::parse(&request.status)?;

        self.routes
            .update_status(route_id, owner, status)
            .await?
            .ok_or_else(|| not_found_error("Route"))
    }

    async fn delete_scoped(&self, route_id: Uuid, owner: Option<Uuid>) -> Result<(), AppError> {
        if !self.routes.soft_delete(route_id, owner).await? {
            return Err(not_found_error("Route"));
        }
        Ok(())
    }

    async fn packages_scoped(
        &self,
        route_id: Uuid,
        owner: Option<Uuid>,
    ) -> Result<Vec<RoutePackage>, AppError> {
        let route = self.find(route_id, owner).await?;
        self.routes.packages(route.id).await
    }

    async fn ensure_user_exists(&self, user_id: Uuid) -> Result<(), AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| not_found_error("User"))
    }
}

fn parse_optional_status(value: Option<&str>) -> Result<Option<RouteStatus>, AppError> {
    value.map(RouteStatus::parse).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_optional_status() {
        assert_eq!(parse_optional_status(None).unwrap(), None);
        assert_eq!(
            parse_optional_status(Some("in progress")).unwrap(),
            Some(RouteStatus::InProgress)
        );
        assert!(matches!(
            parse_optional_status(Some("archived")),
            Err(AppError::BadRequest(_))
        ));
    }
}
