use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::doc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::config::{GoogleSettings, Settings};
use crate::database::{collections, MongoDB};
use crate::models::{CreateUserRequest, User, UserInfo, UserRole};
use crate::services::user_service;
use crate::utils::error::AppError;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // userID
    pub email: String,
    pub role: UserRole,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
}

/// Identity attached to a request by the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserInfo,
}

/// Profile fields Google returns from the userinfo endpoint.
#[derive(Debug, Deserialize)]
pub struct GoogleProfile {
    pub email: String,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

// Generate JWT token
pub fn generate_jwt(user: &User, settings: &Settings) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.user_id.clone(),
        email: user.email.clone(),
        role: user.role,
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(settings.jwt_expires_in_hours)).timestamp() as usize,
        iss: settings.jwt_issuer.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

// Verify JWT token
pub fn verify_token(token: &str, settings: &Settings) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    let mut issuers = HashSet::new();
    issuers.insert(settings.jwt_issuer.clone());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

/// Bearer header first, then the `access_token` cookie.
pub fn extract_token(authorization: Option<&str>, cookie: Option<&str>) -> Option<String> {
    authorization
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .or(cookie.filter(|token| !token.is_empty()))
        .map(String::from)
}

// User login
pub async fn login(
    db: &MongoDB,
    settings: &Settings,
    request: &LoginRequest,
) -> Result<AuthResponse, AppError> {
    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

    let user = db
        .find_one::<User>(collections::USERS, doc! { "email": request.email.trim().to_lowercase() })
        .await?
        .ok_or_else(invalid)?;

    // Google-only accounts have no password
    let stored_password = user.password.as_deref().ok_or_else(invalid)?;
    let valid = bcrypt::verify(&request.password, stored_password)
        .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)))?;
    if !valid {
        return Err(invalid());
    }

    let token = generate_jwt(&user, settings)?;
    Ok(AuthResponse {
        success: true,
        token,
        user: user.into(),
    })
}

pub async fn get_current_user(db: &MongoDB, user_id: &str) -> Result<UserInfo, AppError> {
    user_service::find_user(db, user_id)
        .await?
        .map(UserInfo::from)
        .ok_or_else(|| AppError::not_found("User", user_id))
}

fn google_settings(settings: &Settings) -> Result<&GoogleSettings, AppError> {
    settings
        .google
        .as_ref()
        .ok_or_else(|| AppError::Internal("Google login is not configured".to_string()))
}

/// Google consent URL plus the `state` value the callback must echo back.
pub fn google_auth_url(settings: &Settings) -> Result<(String, String), AppError> {
    let google = google_settings(settings)?;
    let state = Uuid::new_v4().to_string();

    let params = [
        ("client_id", google.client_id.as_str()),
        ("redirect_uri", google.callback_url.as_str()),
        ("response_type", "code"),
        ("scope", "email profile"),
        ("state", state.as_str()),
        ("prompt", "select_account"),
    ];

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    Ok((format!("{}?{}", GOOGLE_AUTH_URL, query_string), state))
}

/// The state returned by Google must match the one issued with the consent URL.
pub fn verify_oauth_state(issued: Option<&str>, returned: Option<&str>) -> Result<(), AppError> {
    match (issued, returned) {
        (Some(issued), Some(returned)) if !issued.is_empty() && issued == returned => Ok(()),
        _ => Err(AppError::Unauthorized("Invalid OAuth state".to_string())),
    }
}

/// Exchanges the authorization code and signs in the Google account, creating a student user on first login.
pub async fn handle_google_callback(
    db: &MongoDB,
    settings: &Settings,
    code: &str,
) -> Result<AuthResponse, AppError> {
    let google = google_settings(settings)?;
    let client = reqwest::Client::new();

    let token_response = client
        .post(GOOGLE_TOKEN_URL)
        .form(&[
            ("code", code),
            ("client_id", google.client_id.as_str()),
            ("client_secret", google.client_secret.as_str()),
            ("redirect_uri", google.callback_url.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to exchange code: {}", e)))?;

    if !token_response.status().is_success() {
        return Err(AppError::Upstream(
            "Failed to exchange authorization code".to_string(),
        ));
    }

    let tokens: GoogleTokenResponse = token_response
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to parse token response: {}", e)))?;

    let profile: GoogleProfile = client
        .get(GOOGLE_USERINFO_URL)
        .bearer_auth(&tokens.access_token)
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to get user info: {}", e)))?
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to parse user info: {}", e)))?;

    let user = find_or_create_google_user(db, &profile).await?;
    let token = generate_jwt(&user, settings)?;

    Ok(AuthResponse {
        success: true,
        token,
        user: user.into(),
    })
}

async fn find_or_create_google_user(db: &MongoDB, profile: &GoogleProfile) -> Result<User, AppError> {
    if let Some(user) = user_service::find_user_by_email(db, &profile.email).await? {
        log::info!("✅ Found existing user for Google login: {}", user.user_id);
        return Ok(user);
    }

    log::info!("🆕 Creating student account from Google profile: {}", profile.email);
    user_service::create_user(db, &google_user_request(profile), UserRole::Student).await
}

fn google_user_request(profile: &GoogleProfile) -> CreateUserRequest {
    let first_name = profile
        .given_name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .or_else(|| profile.email.split('@').next().map(String::from))
        .unwrap_or_default();

    CreateUserRequest {
        email: profile.email.clone(),
        password: None,
        role: Some(UserRole::Student),
        first_name,
        last_name: profile.family_name.clone().unwrap_or_default(),
        profile_picture: profile.picture.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_settings;

    fn user() -> User {
        User {
            user_id: "user-1".into(),
            email: "kamal@uni.lk".into(),
            password: None,
            role: UserRole::Company,
            first_name: "Kamal".into(),
            last_name: "Fernando".into(),
            profile_picture: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_jwt_roundtrip_carries_identity() {
        let settings = test_settings();
        let token = generate_jwt(&user(), &settings).unwrap();
        let claims = verify_token(&token, &settings).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, UserRole::Company);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_jwt_rejects_other_secret_and_issuer() {
        let settings = test_settings();
        let token = generate_jwt(&user(), &settings).unwrap();

        let mut other_secret = test_settings();
        other_secret.jwt_secret = "another-secret".into();
        assert!(matches!(
            verify_token(&token, &other_secret),
            Err(AppError::Unauthorized(_))
        ));

        let mut other_issuer = test_settings();
        other_issuer.jwt_issuer = "someone-else".into();
        assert!(verify_token(&token, &other_issuer).is_err());

        assert!(verify_token("not.a.jwt", &settings).is_err());
    }

    #[test]
    fn test_extract_token_prefers_bearer_header() {
        assert_eq!(
            extract_token(Some("Bearer header-token"), Some("cookie-token")).as_deref(),
            Some("header-token")
        );
        assert_eq!(
            extract_token(None, Some("cookie-token")).as_deref(),
            Some("cookie-token")
        );
        assert_eq!(
            extract_token(Some("Basic abc"), Some("cookie-token")).as_deref(),
            Some("cookie-token")
        );
        assert_eq!(extract_token(Some("Bearer "), None), None);
        assert_eq!(extract_token(None, None), None);
    }

    #[test]
    fn test_google_auth_url_requires_configuration() {
        let settings = test_settings();
        assert!(google_auth_url(&settings).is_err());

        let mut configured = test_settings();
        configured.google = Some(GoogleSettings {
            client_id: "client".into(),
            client_secret: "secret".into(),
            callback_url: "http://localhost:3001/api/auth/google/redirect".into(),
        });
        let (url, state) = google_auth_url(&configured).unwrap();
        assert!(url.starts_with(GOOGLE_AUTH_URL));
        assert!(url.contains(&format!("state={}", state)));
        assert!(url.contains("client_id=client"));
        assert!(url.contains("scope=email%20profile"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3001%2Fapi%2Fauth%2Fgoogle%2Fredirect"));
    }

    #[test]
    fn test_oauth_state_must_match() {
        assert!(verify_oauth_state(Some("abc"), Some("abc")).is_ok());
        assert!(verify_oauth_state(Some("abc"), Some("abd")).is_err());
        assert!(verify_oauth_state(None, Some("abc")).is_err());
        assert!(verify_oauth_state(Some("abc"), None).is_err());
        assert!(verify_oauth_state(Some(""), Some("")).is_err());
    }

    #[test]
    fn test_google_profile_to_student_request() {
        let profile = GoogleProfile {
            email: "sara@gmail.com".into(),
            given_name: None,
            family_name: Some("Silva".into()),
            picture: Some("https://lh3.googleusercontent.com/a/x".into()),
        };
        let request = google_user_request(&profile);
        assert_eq!(request.first_name, "sara");
        assert_eq!(request.last_name, "Silva");
        assert_eq!(request.role, Some(UserRole::Student));
        assert!(request.password.is_none());
    }
}
