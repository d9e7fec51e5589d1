use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::package::{AdminUpdatePackageRequest, Package, PackageDraft, PackageRequest};
use crate::repositories::package_repository::PackageRepository;
use crate::repositories::scope_repository::ScopeRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::{AuthorizationService, Geocoder};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};

const GEOCODING_FAILED: &str = "Unable to retrieve coordinates for the address.";

pub struct PackageController {
    packages: PackageRepository,
    users: UserRepository,
    geocoder: Arc<dyn Geocoder>,
    authorization: AuthorizationService<ScopeRepository>,
}

impl PackageController {
    pub fn new(state: &AppState) -> Self {
        Self {
            packages: PackageRepository::new(state.pool.clone()),
            users: UserRepository::new(state.pool.clone()),
            geocoder: state.geocoder.clone(),
            authorization: AuthorizationService::new(ScopeRepository::new(state.pool.clone())),
        }
    }

    // --- Usuario ---

    pub async fn list_mine(&self, user_id: Uuid) -> Result<Vec<Package>, AppError> {
        self.packages.list_by_user(user_id).await
    }

    pub async fn get_mine(&self, user_id: Uuid, package_id: Uuid) -> Result<Package, AppError> {
        self.find(package_id, Some(user_id)).await
    }

    pub async fn create_for(&self, user_id: Uuid, request: PackageRequest) -> Result<Package, AppError> {
        let draft = self.draft(request).await?;
        let package = self.packages.create(user_id, &draft).await?;

        info!("📦 Paquete creado: {} para {}", package.id, user_id);
        Ok(package)
    }

    pub async fn update_mine(
        &self,
        user_id: Uuid,
        package_id: Uuid,
        request: PackageRequest,
    ) -> Result<Package, AppError> {
        self.update_scoped(package_id, Some(user_id), request, None).await
    }

    pub async fn delete_mine(&self, user_id: Uuid, package_id: Uuid) -> Result<(), AppError> {
        self.delete_scoped(package_id, Some(user_id)).await
    }

    pub async fn set_delivered(
        &self,
        user_id: Uuid,
        package_id: Uuid,
        delivered: bool,
    ) -> Result<Package, AppError> {
        self.packages
            .set_delivered(package_id, user_id, delivered)
            .await?
            .ok_or_else(|| not_found_error("Package"))
    }

    // --- Administración ---

    pub async fn list_all(&self) -> Result<Vec<Package>, AppError> {
        self.packages.list_all().await
    }

    pub async fn admin_get(&self, package_id: Uuid) -> Result<Package, AppError> {
        self.find(package_id, None).await
    }

    pub async fn admin_list_for_user(&self, user_id: Uuid) -> Result<Vec<Package>, AppError> {
        self.ensure_user_exists(user_id).await?;
        self.packages.list_by_user(user_id).await
    }

    pub async fn admin_create_for_user(
        &self,
        user_id: Uuid,
        request: PackageRequest,
    ) -> Result<Package, AppError> {
        self.ensure_user_exists(user_id).await?;
        self.create_for(user_id, request).await
    }

    pub async fn admin_update(
        &self,
        package_id: Uuid,
        request: AdminUpdatePackageRequest,
    ) -> Result<Package, AppError> {
        if let Some(user_id) = request.user_id {
            self.ensure_user_exists(user_id).await?;
        }
        self.update_scoped(package_id, None, request.package, request.user_id)
            .await
    }

    pub async fn admin_delete(&self, package_id: Uuid) -> Result<(), AppError> {
        self.delete_scoped(package_id, None).await
    }

    // --- Owner de empresa ---

    pub async fn owner_list_for_employee(
        &self,
        requester: &AuthenticatedUser,
        user_id: Uuid,
    ) -> Result<Vec<Package>, AppError> {
        self.authorization.employee_company(requester, user_id).await?;
        self.packages.list_by_user(user_id).await
    }

    pub async fn owner_create(
        &self,
        requester: &AuthenticatedUser,
        company_id: Uuid,
        user_id: Uuid,
        request: PackageRequest,
    ) -> Result<Package, AppError> {
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
        package_id: Uuid,
    ) -> Result<Package, AppError> {
        self.authorization
            .ensure_employee_of(requester, company_id, user_id)
            .await?;
        self.find(package_id, Some(user_id)).await
    }

    pub async fn owner_update(
        &self,
        requester: &AuthenticatedUser,
        company_id: Uuid,
        user_id: Uuid,
        package_id: Uuid,
        request: PackageRequest,
    ) -> Result<Package, AppError> {
        self.authorization
            .ensure_employee_of(requester, company_id, user_id)
            .await?;
        self.update_scoped(package_id, Some(user_id), request, None)
            .await
    }

    pub async fn owner_delete(
        &self,
        requester: &AuthenticatedUser,
        company_id: Uuid,
        user_id: Uuid,
        package_id: Uuid,
    ) -> Result<(), AppError> {
        self.authorization
            .ensure_employee_of(requester, company_id, user_id)
            .await?;
        self.delete_scoped(package_id, Some(user_id)).await
    }

    // --- Internos ---

    async fn find(&self, package_id: Uuid, owner: Option<Uuid>) -> Result<Package, AppError> {
        self.packages
            .find(package_id, owner)
            .await?
            .ok_or_else(|| not_found_error("Package"))
    }

    async fn update_scoped(
        &self,
        package_id: Uuid,
        owner: Option<Uuid>,
        request: PackageRequest,
        reassign_to: Option<Uuid>,
    ) -> Result<Package, AppError> {
        self.find(package_id, owner).await?;

        let draft = self.draft(request).await?;
        self.packages
            .update(package_id, owner, &draft, reassign_to)
            .await?
            .ok_or_else(|| not_found_error("Package"))
    }

    async fn delete_scoped(&self, package_id: Uuid, owner: Option<Uuid>) -> Result<(), AppError> {
        if !self.packages.soft_delete(package_id, owner).await? {
            return Err(not_found_error("Package"));
        }
        Ok(())
    }

    async fn ensure_user_exists(&self, user_id: Uuid) -> Result<(), AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| not_found_error("User"))
    }

    /// Geocodifica la dirección antes de cualquier escritura
    async fn draft(&self, request: PackageRequest) -> Result<PackageDraft, AppError> {
        let address = request.destination_address.trim().to_string();

        match self.geocoder.geocode(&address).await {
            Ok(Some(coordinates)) => Ok(PackageDraft::new(
                request,
                coordinates.latitude,
                coordinates.longitude,
            )),
            Ok(None) => Err(AppError::BadRequest(GEOCODING_FAILED.to_string())),
            Err(e) => {
                warn!("⚠️ Error geocodificando '{}': {}", address, e);
                Err(AppError::BadRequest(GEOCODING_FAILED.to_string()))
            }
        }
    }
}
