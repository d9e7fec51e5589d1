//! Acceso a datos: un repositorio por tabla, SQL parametrizado con SQLx

pub mod company_repository;
pub mod package_repository;
pub mod route_repository;
pub mod scope_repository;
pub mod support_repository;
pub mod time_entry_repository;
pub mod user_repository;
