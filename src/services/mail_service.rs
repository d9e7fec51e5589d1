//! Envío de correos transaccionales
//!
//! `HttpMailer` publica el mensaje en una API HTTP de correo; sin API configurada
//! se usa `LogMailer`, que solo lo deja en el log.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: MailMessage) -> Result<()>;
}

#[derive(Serialize)]
struct MailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    from: String,
}

impl HttpMailer {
    pub fn new(client: Client, api_url: String, api_key: Option<String>, from: String) -> Self {
        Self {
            client,
            api_url,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: MailMessage) -> Result<()> {
        let payload = MailPayload {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.text,
        };

        let mut request = self.client.post(&self.api_url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Mail API error {}: {}", status, body));
        }

        info!("📧 Correo enviado a {}", message.to);
        Ok(())
    }
}

pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: MailMessage) -> Result<()> {
        info!(
            "📧 [mail deshabilitado] to={} subject={:?}\n{}",
            message.to, message.subject, message.text
        );
        Ok(())
    }
}

pub fn verification_email(to: &str, frontend_url: &str, token: &str) -> MailMessage {
    MailMessage {
        to: to.to_string(),
        subject: "Verify your FastRoute account".to_string(),
        text: format!(
            "Welcome to FastRoute!\n\nConfirm your email address by opening this link:\n{}/verify/{}\n",
            frontend_url.trim_end_matches('/'),
            token
        ),
    }
}

pub fn reset_password_email(to: &str, frontend_url: &str, token: &str) -> MailMessage {
    MailMessage {
        to: to.to_string(),
        subject: "Reset your FastRoute password".to_string(),
        text: format!(
            "We received a request to reset your password.\n\nOpen this link within the next hour:\n{}/reset-password/{}\n\nIf you did not request it, ignore this email.\n",
            frontend_url.trim_end_matches('/'),
            token
        ),
    }
}

pub fn support_notification_email(
    to: &str,
    user_name: &str,
    user_email: &str,
    category: &str,
    message: &str,
) -> MailMessage {
    MailMessage {
        to: to.to_string(),
        subject: format!("[Support] {}", category),
        text: format!(
            "New support message from {} <{}>\nCategory: {}\n\n{}\n",
            user_name, user_email, category, message
        ),
    }
}
