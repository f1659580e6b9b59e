use std::env;

/// Service configuration gathered from the environment at startup.
///
/// Secrets have no fallback values: a missing GOOGLE_CLIENT_SECRET,
/// OPENAI_API_KEY or SESSION_SECRET aborts startup instead of running
/// with a placeholder.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: String,
    pub mongodb_url: String,
    pub database_name: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_redirect_uri: String,
    pub openai_api_key: String,
    pub openai_completions_url: String,
    pub openai_model: String,
    pub openai_max_tokens: u32,
    pub session_secret: String,
    pub frontend_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let config = AppConfig {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT").unwrap_or_else(|_| "8000".to_string()),
            mongodb_url: env::var("MONGODB_URL")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| "college_match".to_string()),
            google_client_id: require("GOOGLE_CLIENT_ID")?,
            google_client_secret: require("GOOGLE_CLIENT_SECRET")?,
            google_redirect_uri: env::var("GOOGLE_REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:8000/login/callback".to_string()),
            openai_api_key: require("OPENAI_API_KEY")?,
            openai_completions_url: env::var("OPENAI_COMPLETIONS_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/completions".to_string()),
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-3.5-turbo-instruct".to_string()),
            openai_max_tokens: parse_max_tokens(env::var("OPENAI_MAX_TOKENS").ok())?,
            session_secret: require("SESSION_SECRET")?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        };

        // actix's cookie Key::from panics below 64 bytes, so reject early
        if config.session_secret.len() < 64 {
            return Err("SESSION_SECRET must be at least 64 bytes".to_string());
        }

        Ok(config)
    }
}

fn require(name: &str) -> Result<String, String> {
    let value = env::var(name).map_err(|_| format!("{} must be set", name))?;
    if value.trim().is_empty() {
        return Err(format!("{} must not be empty", name));
    }
    Ok(value)
}

fn parse_max_tokens(raw: Option<String>) -> Result<u32, String> {
    match raw {
        Some(value) => value
            .parse::<u32>()
            .map_err(|_| format!("OPENAI_MAX_TOKENS must be a number, got '{}'", value)),
        None => Ok(150),
    }
}
