use tracing::info;
use uuid::Uuid;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::company::{Company, CompanySummary, CompanyWithOwner, CreateCompanyRequest};
use crate::models::user::UserResponse;
use crate::repositories::company_repository::CompanyRepository;
use crate::repositories::scope_repository::ScopeRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::AuthorizationService;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, internal_error, not_found_error, AppError};
use crate::utils::tokens::generate_join_code;

pub struct CompanyController {
    companies: CompanyRepository,
    users: UserRepository,
    authorization: AuthorizationService<ScopeRepository>,
}

impl CompanyController {
    pub fn new(state: &AppState) -> Self {
        Self {
            companies: CompanyRepository::new(state.pool.clone()),
            users: UserRepository::new(state.pool.clone()),
            authorization: AuthorizationService::new(ScopeRepository::new(state.pool.clone())),
        }
    }

    pub async fn create(
        &self,
        requester: &AuthenticatedUser,
        request: CreateCompanyRequest,
    ) -> Result<Company, AppError> {
        let name = request.name.trim();

        // Un segundo intento si el código ya existe
        for _ in 0..2 {
            let join_code = generate_join_code();
            if let Some(company) = self
                .companies
                .create(name, requester.user_id, &join_code)
                .await?
            {
                info!("🏢 Empresa creada: {} por {}", company.id, requester.user_id);
                return Ok(company);
            }
        }

        Err(internal_error("Could not generate a unique company code"))
    }

    pub async fn my_companies(&self, requester: &AuthenticatedUser) -> Result<Vec<Company>, AppError> {
        self.companies.list_by_owner(requester.user_id).await
    }

    pub async fn summary(&self, company_id: Uuid) -> Result<CompanySummary, AppError> {
        Ok(self.find_company(company_id).await?.into())
    }

    pub async fn delete(&self, requester: &AuthenticatedUser, company_id: Uuid) -> Result<(), AppError> {
        self.authorization.ensure_owner(requester, company_id).await?;

        if !self.companies.soft_delete(company_id).await? {
            return Err(not_found_error("Company"));
        }

        info!("🗑️ Empresa eliminada: {}", company_id);
        Ok(())
    }

    pub async fn employees(
        &self,
        requester: &AuthenticatedUser,
        company_id: Uuid,
    ) -> Result<Vec<UserResponse>, AppError> {
        self.authorization.ensure_owner(requester, company_id).await?;
        self.find_company(company_id).await?;

        let users = self.users.list_by_company(company_id).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn employee(
        &self,
        requester: &AuthenticatedUser,
        company_id: Uuid,
        user_id: Uuid,
    ) -> Result<UserResponse, AppError> {
        self.authorization.ensure_owner(requester, company_id).await?;

        let user = self
            .users
            .find_in_company(company_id, user_id)
            .await?
            .ok_or_else(|| not_found_error("User in this company"))?;

        Ok(user.into())
    }

    pub async fn remove_employee(
        &self,
        requester: &AuthenticatedUser,
        company_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        if requester.user_id == user_id {
            return Err(bad_request_error("You cannot remove yourself from your own company"));
        }

        self.authorization.ensure_owner(requester, company_id).await?;

        if !self.companies.remove_employee(company_id, user_id).await? {
            return Err(not_found_error("User in this company"));
        }
        Ok(())
    }

    // --- Administración ---

    pub async fn list_all(&self) -> Result<Vec<CompanyWithOwner>, AppError> {
        self.companies.list_all_with_owner().await
    }

    pub async fn get(&self, company_id: Uuid) -> Result<Company, AppError> {
        self.find_company(company_id).await
    }

    async fn find_company(&self, company_id: Uuid) -> Result<Company, AppError> {
        self.companies
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| not_found_error("Company"))
    }
}
