//! Middleware HTTP: autenticación, roles y CORS

pub mod auth;
pub mod cors;

pub use auth::{admin_only_middleware, admin_or_owner_middleware, auth_middleware, AuthenticatedUser};
pub use cors::cors_middleware_with_origins;
