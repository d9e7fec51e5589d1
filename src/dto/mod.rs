//! DTOs de la API y de los proveedores externos

pub mod api_response;
pub mod mapbox_dto;
pub mod navigation_dto;

pub use api_response::ApiResponse;
