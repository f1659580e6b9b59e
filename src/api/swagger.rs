use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "College Match Service API",
        version = "1.0.0",
        description = "Backend for the college-recommendation questionnaire app.\n\n**Features:**\n- Questionnaire submission and persistence\n- Google OAuth and email/password authentication\n- College rankings via an external completion API\n- Health monitoring",
        contact(
            name = "College Match Team",
            email = "support@college-match.app"
        )
    ),
    paths(
        crate::api::health::health_check,
        crate::api::auth::profile,
        crate::api::auth::register,
        crate::api::auth::login_email,
        crate::api::responses::submit_response,
        crate::api::rankings::get_college_rankings,
    ),
    components(
        schemas(
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::SessionUser,
            crate::models::questionnaire::Questionnaire,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Authentication endpoints. Google OAuth issues a session cookie; email/password uses the same session contract."),
        (name = "Questionnaire", description = "Questionnaire submission and persistence."),
        (name = "Rankings", description = "College rankings produced by the external completion API."),
        (name = "Health", description = "Liveness endpoint for monitoring."),
    )
)]
pub struct ApiDoc;
