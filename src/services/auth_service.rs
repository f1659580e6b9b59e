use crate::config::AppConfig;
use crate::database::{MongoDB, USERS_COLLECTION};
use crate::models::user::User;
use crate::utils::error::AppError;
use base64::Engine;
use bcrypt::{hash, verify, DEFAULT_COST};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Session key holding the logged-in user's claims.
pub const SESSION_USER_KEY: &str = "user";
/// Session key holding the OAuth state parameter between redirect and callback.
pub const SESSION_STATE_KEY: &str = "oauth_state";

const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Claims kept in the session cookie after a successful login, either path.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct SessionUser {
    pub sub: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

// Local registration
pub async fn register(db: &MongoDB, request: &RegisterRequest) -> Result<(), AppError> {
    let collection = db.collection::<User>(USERS_COLLECTION);

    let filter = doc! { "email": &request.email };

    let existing = collection
        .find_one(filter)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if existing.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let hashed_password = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::Database(format!("Failed to hash password: {}", e)))?;

    let new_user = User {
        _id: None,
        user_id: ObjectId::new().to_hex(),
        email: request.email.clone(),
        password: hashed_password,
        created_at: Some(BsonDateTime::now()),
    };

    collection.insert_one(&new_user).await.map_err(|e| {
        // The unique email index closes the find-then-insert race
        if is_duplicate_key(&e) {
            AppError::Conflict("Email already registered".to_string())
        } else {
            AppError::Database(e.to_string())
        }
    })?;

    log::info!("✅ User registered: {}", request.email);

    Ok(())
}

// Local login. Failures are deliberately indistinguishable to the caller.
pub async fn login(db: &MongoDB, request: &LoginRequest) -> Result<SessionUser, AppError> {
    let collection = db.collection::<User>(USERS_COLLECTION);

    let filter = doc! { "email": &request.email };

    let user = collection
        .find_one(filter)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    // bcrypt::verify re-derives the hash and compares in constant time
    let valid = verify(&request.password, &user.password)
        .map_err(|e| AppError::Database(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    Ok(SessionUser {
        sub: user.user_id,
        email: user.email,
        name: None,
        picture: None,
    })
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};
    matches!(
        *error.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) if write_error.code == 11000
    )
}

/// Google authorization URL the browser is redirected to.
pub fn google_authorize_url(config: &AppConfig, state: &str) -> String {
    let params = vec![
        ("client_id", config.google_client_id.as_str()),
        ("redirect_uri", config.google_redirect_uri.as_str()),
        ("response_type", "code"),
        ("scope", "openid email profile"),
        ("state", state),
    ];

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", GOOGLE_AUTHORIZE_URL, query_string)
}

/// Exchanges the authorization code for tokens and pulls identity claims
/// out of the returned id_token.
pub async fn exchange_google_code(
    http: &reqwest::Client,
    config: &AppConfig,
    code: &str,
) -> Result<SessionUser, AppError> {
    let token_response = http
        .post(GOOGLE_TOKEN_URL)
        .form(&[
            ("code", code),
            ("client_id", &config.google_client_id),
            ("client_secret", &config.google_client_secret),
            ("redirect_uri", &config.google_redirect_uri),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to exchange code: {}", e)))?;

    if !token_response.status().is_success() {
        return Err(AppError::Upstream(format!(
            "Token endpoint returned {}",
            token_response.status()
        )));
    }

    let tokens: serde_json::Value = token_response
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to parse token response: {}", e)))?;

    let id_token = tokens["id_token"]
        .as_str()
        .ok_or_else(|| AppError::Upstream("No id_token in response".to_string()))?;

    let claims = decode_id_token_claims(id_token)?;
    session_user_from_claims(&claims)
}

/// Decodes the JWT payload segment of an id_token. No signature check:
/// the token arrives directly from Google's token endpoint over TLS.
pub fn decode_id_token_claims(id_token: &str) -> Result<serde_json::Value, AppError> {
    let token_parts: Vec<&str> = id_token.split('.').collect();
    if token_parts.len() < 2 {
        return Err(AppError::Upstream("Invalid id_token format".to_string()));
    }

    let payload_bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(token_parts[1])
        .map_err(|e| AppError::Upstream(format!("Failed to decode id_token payload: {}", e)))?;

    serde_json::from_slice(&payload_bytes)
        .map_err(|e| AppError::Upstream(format!("Failed to parse id_token payload: {}", e)))
}

pub fn session_user_from_claims(claims: &serde_json::Value) -> Result<SessionUser, AppError> {
    let sub = claims["sub"]
        .as_str()
        .ok_or_else(|| AppError::Upstream("No sub in id_token".to_string()))?;
    let email = claims["email"]
        .as_str()
        .ok_or_else(|| AppError::Upstream("No email in id_token".to_string()))?;

    Ok(SessionUser {
        sub: sub.to_string(),
        email: email.to_string(),
        name: claims["name"].as_str().map(String::from),
        picture: claims["picture"].as_str().map(String::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: "8000".to_string(),
            mongodb_url: "mongodb://localhost:27017".to_string(),
            database_name: "college_match_test".to_string(),
            google_client_id: "client-id-123".to_string(),
            google_client_secret: "shh".to_string(),
            google_redirect_uri: "http://localhost:8000/login/callback".to_string(),
            openai_api_key: "sk-test".to_string(),
            openai_completions_url: "https://api.openai.com/v1/completions".to_string(),
            openai_model: "gpt-3.5-turbo-instruct".to_string(),
            openai_max_tokens: 150,
            session_secret: "x".repeat(64),
            frontend_url: "http://localhost:3000".to_string(),
        }
    }

    #[test]
    fn test_google_authorize_url_carries_oauth_params() {
        let url = google_authorize_url(&test_config(), "state-abc");

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client-id-123"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8000%2Flogin%2Fcallback"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=openid%20email%20profile"));
        assert!(url.contains("state=state-abc"));
    }

    fn fake_id_token(payload: &serde_json::Value) -> String {
        let header = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let body = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .encode(serde_json::to_vec(payload).unwrap());
        format!("{}.{}.sig", header, body)
    }

    #[test]
    fn test_decode_id_token_claims() {
        let payload = serde_json::json!({
            "sub": "1234567890",
            "email": "student@example.com",
            "name": "Test Student",
            "picture": "https://example.com/photo.jpg"
        });
        let claims = decode_id_token_claims(&fake_id_token(&payload)).unwrap();

        let user = session_user_from_claims(&claims).unwrap();
        assert_eq!(user.sub, "1234567890");
        assert_eq!(user.email, "student@example.com");
        assert_eq!(user.name.as_deref(), Some("Test Student"));
        assert_eq!(user.picture.as_deref(), Some("https://example.com/photo.jpg"));
    }

    #[test]
    fn test_decode_rejects_malformed_token() {
        assert!(decode_id_token_claims("not-a-jwt").is_err());
        assert!(decode_id_token_claims("bad.!!!.sig").is_err());
    }

    #[test]
    fn test_claims_without_identity_are_rejected() {
        let claims = serde_json::json!({ "email": "student@example.com" });
        assert!(session_user_from_claims(&claims).is_err());

        let claims = serde_json::json!({ "sub": "1234567890" });
        assert!(session_user_from_claims(&claims).is_err());
    }

    #[test]
    fn test_bcrypt_roundtrip() {
        // Low cost to keep the test fast; production uses DEFAULT_COST
        let hashed = hash("hunter2", 4).unwrap();
        assert!(verify("hunter2", &hashed).unwrap());
        assert!(!verify("hunter3", &hashed).unwrap());
    }
}
