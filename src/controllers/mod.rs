pub mod auth_controller;
pub mod company_controller;
pub mod package_controller;
pub mod route_controller;
pub mod support_controller;
pub mod time_controller;
