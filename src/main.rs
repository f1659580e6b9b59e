mod api;
mod config;
mod database;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Key, SameSite};
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("🚀 Starting College Match Service...");

    // Configuration is validated up front; missing secrets abort startup
    let config = match config::AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    log::info!("📊 Database: {} ({})", config.mongodb_url, config.database_name);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&config.mongodb_url, &config.database_name)
        .await
        .expect("Failed to connect to MongoDB");

    log::info!("✅ MongoDB connected successfully");

    // Shared outbound HTTP client (Google token endpoint + completion API)
    let http_client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .expect("Failed to build HTTP client");

    let session_key = Key::from(config.session_secret.as_bytes());
    let host = config.host.clone();
    let port = config.port.clone();
    let frontend_url = config.frontend_url.clone();

    let db_data = web::Data::new(db);
    let config_data = web::Data::new(config);
    let http_data = web::Data::new(http_client);

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_url)
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        // Cookie-backed session, one hour, same lifetime the original app used
        let session = SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
            .cookie_name("session".to_string())
            .cookie_path("/".to_string())
            .cookie_secure(false) // localhost development; set behind TLS in production
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(SameSite::Lax)
            .session_lifecycle(
                PersistentSession::default()
                    .session_ttl(actix_web::cookie::time::Duration::hours(1)),
            )
            .build();

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(config_data.clone())
            .app_data(http_data.clone())
            .wrap(cors)
            .wrap(session)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            // Liveness
            .route("/", web::get().to(api::health::health_check))
            // Federated auth flow
            .route("/login", web::get().to(api::auth::login))
            .route("/login/callback", web::get().to(api::auth::login_callback))
            .route("/profile", web::route().to(api::auth::profile))
            // Local auth flow
            .route("/register/", web::post().to(api::auth::register))
            .route("/login-email/", web::post().to(api::auth::login_email))
            // Questionnaire
            .route("/submit-response/", web::post().to(api::responses::submit_response))
            .route(
                "/get-college-rankings/",
                web::post().to(api::rankings::get_college_rankings),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
