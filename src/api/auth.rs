use crate::config::AppConfig;
use crate::database::MongoDB;
use crate::services::auth_service;
use crate::services::auth_service::{
    LoginRequest, RegisterRequest, SessionUser, SESSION_STATE_KEY, SESSION_USER_KEY,
};
use crate::utils::error::AppError;
use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

/// Starts the federated flow: stash a state parameter in the session and
/// send the browser to Google.
pub async fn login(session: Session, config: web::Data<AppConfig>) -> HttpResponse {
    log::info!("🔐 GET /login - Redirecting to Google");

    let state = Uuid::new_v4().to_string();
    if let Err(e) = session.insert(SESSION_STATE_KEY, &state) {
        log::error!("❌ Failed to store OAuth state: {}", e);
        return super::error_response(&AppError::Database(
            "Failed to initialize login".to_string(),
        ));
    }

    let auth_url = auth_service::google_authorize_url(&config, &state);

    HttpResponse::Found()
        .append_header(("Location", auth_url))
        .finish()
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Completes the federated flow: verify state, exchange the code, put the
/// identity claims in the session, land on /profile.
pub async fn login_callback(
    session: Session,
    config: web::Data<AppConfig>,
    http: web::Data<reqwest::Client>,
    query: web::Query<CallbackQuery>,
) -> HttpResponse {
    log::info!("🔐 GET /login/callback - Processing Google OAuth");

    if let Some(error) = &query.error {
        log::warn!("❌ OAuth error from provider: {}", error);
        return super::error_response(&AppError::Unauthorized(format!(
            "Authorization failed: {}",
            error
        )));
    }

    let stored_state: Option<String> = session.remove_as(SESSION_STATE_KEY).and_then(Result::ok);
    match (&query.state, stored_state) {
        (Some(received), Some(expected)) if *received == expected => {}
        _ => {
            log::warn!("❌ OAuth state mismatch");
            return super::error_response(&AppError::Unauthorized(
                "Invalid OAuth state".to_string(),
            ));
        }
    }

    let code = match &query.code {
        Some(c) => c,
        None => {
            log::warn!("❌ No authorization code provided");
            return super::error_response(&AppError::Validation(
                "Missing authorization code".to_string(),
            ));
        }
    };

    match auth_service::exchange_google_code(&http, &config, code).await {
        Ok(user) => {
            if let Err(e) = session.insert(SESSION_USER_KEY, &user) {
                log::error!("❌ Failed to store session claims: {}", e);
                return super::error_response(&AppError::Database(
                    "Failed to establish session".to_string(),
                ));
            }
            log::info!("✅ Google OAuth successful: {}", user.email);
            HttpResponse::Found()
                .append_header(("Location", "/profile"))
                .finish()
        }
        Err(e) => {
            log::error!("❌ Google OAuth failed: {}", e);
            super::error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/profile",
    tag = "Auth",
    responses(
        (status = 200, description = "Session claims for the logged-in user", body = SessionUser),
        (status = 401, description = "No active session")
    )
)]
pub async fn profile(session: Session) -> HttpResponse {
    match session.get::<SessionUser>(SESSION_USER_KEY) {
        Ok(Some(user)) => HttpResponse::Ok().json(user),
        Ok(None) => {
            log::warn!("❌ /profile without a session");
            super::error_response(&AppError::Unauthorized("Not logged in".to_string()))
        }
        Err(e) => {
            log::error!("❌ Failed to read session: {}", e);
            super::error_response(&AppError::Database("Failed to read session".to_string()))
        }
    }
}

#[utoipa::path(
    post,
    path = "/register/",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    db: web::Data<MongoDB>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    log::info!("📝 POST /register/ - email: {}", request.email);

    match auth_service::register(&db, &request).await {
        Ok(()) => {
            log::info!("✅ Registration successful: {}", request.email);
            HttpResponse::Created().json(serde_json::json!({
                "message": "User registered successfully"
            }))
        }
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", request.email, e);
            super::error_response(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/login-email/",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login_email(
    db: web::Data<MongoDB>,
    session: Session,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /login-email/ - email: {}", request.email);

    match auth_service::login(&db, &request).await {
        Ok(user) => {
            // Same session contract as the federated path
            if let Err(e) = session.insert(SESSION_USER_KEY, &user) {
                log::error!("❌ Failed to store session claims: {}", e);
                return super::error_response(&AppError::Database(
                    "Failed to establish session".to_string(),
                ));
            }
            log::info!("✅ Login successful: {}", request.email);
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Login successful"
            }))
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            super::error_response(&e)
        }
    }
}
