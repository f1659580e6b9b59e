pub mod auth;
pub mod health;
pub mod rankings;
pub mod responses;
pub mod swagger;

use crate::utils::error::AppError;
use actix_web::HttpResponse;

/// Boundary translation: error kind picks the status, message goes to the body.
pub(crate) fn error_response(error: &AppError) -> HttpResponse {
    HttpResponse::build(error.status_code()).json(serde_json::json!({
        "success": false,
        "error": error.to_string()
    }))
}
