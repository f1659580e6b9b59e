pub mod auth_service;
pub mod rankings_service;
pub mod response_service;

pub use rankings_service::*;
pub use response_service::*;
