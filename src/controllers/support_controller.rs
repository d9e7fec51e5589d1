use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::models::support_message::{
    CreateSupportRequest, SupportCategory, SupportMessage, SupportMessageWithUser, SupportStatus,
    UpdateSupportStatusRequest,
};
use crate::repositories::support_repository::SupportRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::mail_service::{support_notification_email, Mailer};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};

pub struct SupportController {
    messages: SupportRepository,
    users: UserRepository,
    mailer: Arc<dyn Mailer>,
    support_email: String,
}

impl SupportController {
    pub fn new(state: &AppState) -> Self {
        Self {
            messages: SupportRepository::new(state.pool.clone()),
            users: UserRepository::new(state.pool.clone()),
            mailer: state.mailer.clone(),
            support_email: state.config.support_email.clone(),
        }
    }

    /// Guarda el mensaje y avisa al equipo de soporte; el aviso no bloquea la respuesta
    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateSupportRequest,
    ) -> Result<SupportMessage, AppError> {
        let category = SupportCategory::parse(&request.category)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| not_found_error("User"))?;

        let message = self
            .messages
            .create(user_id, category, request.message.trim())
            .await?;

        let notification = support_notification_email(
            &self.support_email,
            &user.name,
            &user.email,
            category.as_str(),
            &message.message,
        );
        if let Err(e) = self.mailer.send(notification).await {
            warn!("⚠️ No se pudo notificar el mensaje de soporte {}: {}", message.id, e);
        }

        info!("🆘 Mensaje de soporte creado: {}", message.id);
        Ok(message)
    }

    pub async fn list_all(&self) -> Result<Vec<SupportMessageWithUser>, AppError> {
        self.messages.list_all().await
    }

    pub async fn get(&self, id: Uuid) -> Result<SupportMessageWithUser, AppError> {
        self.messages
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Support message"))
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        request: UpdateSupportStatusRequest,
    ) -> Result<SupportMessage, AppError> {
        let status = SupportStatus::parse(&request.status)?;

        self.messages
            .update_status(id, status)
            .await?
            .ok_or_else(|| not_found_error("Support message"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.messages.soft_delete(id).await? {
            return Err(not_found_error("Support message"));
        }
        Ok(())
    }
}
