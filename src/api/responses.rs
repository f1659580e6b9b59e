use crate::database::MongoDB;
use crate::models::questionnaire::Questionnaire;
use crate::services::response_service;
use actix_web::{web, HttpResponse};

#[utoipa::path(
    post,
    path = "/submit-response/",
    tag = "Questionnaire",
    request_body = Questionnaire,
    responses(
        (status = 200, description = "Response saved"),
        (status = 400, description = "Invalid preference value"),
        (status = 500, description = "Failed to save response")
    )
)]
pub async fn submit_response(
    db: web::Data<MongoDB>,
    response: web::Json<Questionnaire>,
) -> HttpResponse {
    log::info!(
        "📋 POST /submit-response/ - major: {}, preference: {}",
        response.major,
        response.preference
    );

    match response_service::save_response(&db, &response).await {
        Ok(()) => {
            log::info!("✅ Response saved");
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Response saved successfully"
            }))
        }
        Err(e) => {
            log::warn!("❌ Failed to save response: {}", e);
            super::error_response(&e)
        }
    }
}
