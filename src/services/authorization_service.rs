//! Cadena de autorización de owners sobre empleados
//!
//! Un owner solo puede actuar sobre los usuarios de una empresa que él creó.
//! Cada petición vuelve a comprobar la cadena usuario → empresa → owner;
//! el admin salta la comprobación de propiedad pero no la de pertenencia.

use async_trait::async_trait;
use uuid::Uuid;

use crate::middleware::auth::AuthenticatedUser;
use crate::utils::errors::{bad_request_error, forbidden_error, AppError};

/// Consultas que necesita la cadena de autorización
#[async_trait]
pub trait ScopeStore: Send + Sync {
    /// `None` si el usuario no existe; `Some(None)` si no tiene empresa
    async fn user_company(&self, user_id: Uuid) -> Result<Option<Option<Uuid>>, AppError>;

    async fn is_company_owner(&self, company_id: Uuid, owner_id: Uuid) -> Result<bool, AppError>;
}

pub struct AuthorizationService<S: ScopeStore> {
    store: S,
}

impl<S: ScopeStore> AuthorizationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Rutas con empresa en el path: `/companies/:company_id/users/:user_id/...`
    pub async fn ensure_employee_of(
        &self,
        requester: &AuthenticatedUser,
        company_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let target_company = self
            .store
            .user_company(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?
            .ok_or_else(|| bad_request_error("User does not belong to this company"))?;

        self.ensure_owner(requester, target_company).await?;

        if target_company != company_id {
            return Err(bad_request_error("User does not belong to this company"));
        }

        Ok(())
    }

    /// Rutas sin empresa en el path: `/companies/user/:user_id/...`.
    /// Devuelve la empresa del empleado.
    pub async fn employee_company(
        &self,
        requester: &AuthenticatedUser,
        user_id: Uuid,
    ) -> Result<Uuid, AppError> {
        let company_id = self
            .store
            .user_company(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?
            .ok_or_else(|| AppError::NotFound("User does not belong to any company".to_string()))?;

        self.ensure_owner(requester, company_id).await?;
        Ok(company_id)
    }

    /// Solo el creador de la empresa (o un admin) puede gestionarla
    pub async fn ensure_owner(
        &self,
        requester: &AuthenticatedUser,
        company_id: Uuid,
    ) -> Result<(), AppError> {
        if requester.role.is_admin() {
            return Ok(());
        }

        if !self.store.is_company_owner(company_id, requester.user_id).await? {
            return Err(forbidden_error("You do not have permission to manage this company"));
        }

        Ok(())
    }
}
