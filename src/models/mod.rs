//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL, junto con los requests que los crean o modifican.

pub mod company;
pub mod package;
pub mod route;
pub mod support_message;
pub mod time_entry;
pub mod user;
