use crate::config::AppConfig;
use crate::models::questionnaire::Questionnaire;
use crate::services::rankings_service;
use actix_web::{web, HttpResponse};

#[utoipa::path(
    post,
    path = "/get-college-rankings/",
    tag = "Rankings",
    request_body = Questionnaire,
    responses(
        (status = 200, description = "Ranked college list"),
        (status = 400, description = "Invalid preference value"),
        (status = 500, description = "Completion API failure")
    )
)]
pub async fn get_college_rankings(
    config: web::Data<AppConfig>,
    http: web::Data<reqwest::Client>,
    response: web::Json<Questionnaire>,
) -> HttpResponse {
    log::info!(
        "🎓 POST /get-college-rankings/ - major: {}, preference: {}",
        response.major,
        response.preference
    );

    match rankings_service::get_college_rankings(&http, &config, &response).await {
        Ok(rankings) => {
            log::info!("✅ Rankings generated");
            HttpResponse::Ok().json(serde_json::json!({ "rankings": rankings }))
        }
        Err(e) => {
            log::error!("❌ Failed to get rankings: {}", e);
            super::error_response(&e)
        }
    }
}
