//! Middleware de autenticación JWT
//!
//! Este módulo verifica el token de sesión (cookie `token` o header
//! `Authorization: Bearer`) y los roles requeridos por cada grupo de rutas.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    models::user::UserRole,
    state::AppState,
    utils::{
        cookies::session_token,
        errors::{forbidden_error, AppError},
        jwt,
    },
};

const NOT_AUTHORIZED: &str = "You are not authorized";

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: UserRole,
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(request.headers())
        .or_else(|| {
            request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| jwt::extract_token_from_header(value).ok())
                .map(str::to_string)
        })
        .ok_or_else(|| AppError::Unauthorized(NOT_AUTHORIZED.to_string()))?;

    let claims = jwt::verify_token(&token, &state.jwt_config())
        .map_err(|_| AppError::Unauthorized(NOT_AUTHORIZED.to_string()))?;

    let authenticated_user = AuthenticatedUser {
        user_id: claims.id,
        role: claims.role,
    };

    // Inyectar usuario autenticado en las extensions
    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

fn current_user(request: &Request) -> Result<&AuthenticatedUser, AppError> {
    request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized(NOT_AUTHORIZED.to_string()))
}

/// Middleware para verificar permisos de admin
pub async fn admin_only_middleware(request: Request, next: Next) -> Result<Response, AppError> {
    if !current_user(&request)?.role.is_admin() {
        return Err(forbidden_error("Access denied: administrators only"));
    }

    Ok(next.run(request).await)
}

/// Middleware para verificar permisos de admin u owner
pub async fn admin_or_owner_middleware(request: Request, next: Next) -> Result<Response, AppError> {
    if !current_user(&request)?.role.is_admin_or_owner() {
        return Err(forbidden_error("Access denied: administrators or company owners only"));
    }

    Ok(next.run(request).await)
}
