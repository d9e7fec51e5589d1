//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! JWT, cookies de sesión y generación de códigos.

pub mod cookies;
pub mod errors;
pub mod extract;
pub mod jwt;
pub mod tokens;
pub mod validation;
