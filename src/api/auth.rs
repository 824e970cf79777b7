use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::http::header::LOCATION;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::config::Settings;
use crate::database::MongoDB;
use crate::models::UserInfo;
use crate::services::auth_service::{
    self, AuthResponse, AuthUser, LoginRequest, ACCESS_TOKEN_COOKIE, OAUTH_STATE_COOKIE,
};
use crate::utils::error::AppError;

#[derive(Debug, Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

const OAUTH_STATE_PATH: &str = "/api/auth/google";

fn access_cookie(token: String, settings: &Settings) -> Cookie<'static> {
    Cookie::build(ACCESS_TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(settings.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(settings.jwt_expires_in_hours))
        .finish()
}

/// Short-lived cookie binding the consent redirect to this browser.
fn state_cookie(state: String, settings: &Settings) -> Cookie<'static> {
    Cookie::build(OAUTH_STATE_COOKIE, state)
        .path(OAUTH_STATE_PATH)
        .http_only(true)
        .secure(settings.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::minutes(10))
        .finish()
}

fn cleared_state_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(OAUTH_STATE_COOKIE, "").path(OAUTH_STATE_PATH).finish();
    cookie.make_removal();
    cookie
}

/// `{FRONTEND_URL}/auth/error?message=...`
pub fn error_redirect_url(frontend_url: &str, message: &str) -> String {
    format!(
        "{}/auth/error?message={}",
        frontend_url.trim_end_matches('/'),
        urlencoding::encode(message)
    )
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    db: web::Data<MongoDB>,
    settings: web::Data<Settings>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔐 POST /auth/login - email: {}", request.email);

    let response = auth_service::login(&db, &settings, &request)
        .await
        .map_err(|e| {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            e
        })?;

    log::info!("✅ Login successful: {}", response.user.user_id);
    Ok(HttpResponse::Ok()
        .cookie(access_cookie(response.token.clone(), &settings))
        .json(response))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Session cookie cleared"))
)]
pub async fn logout() -> HttpResponse {
    log::info!("👋 POST /auth/logout");

    let mut cookie = Cookie::build(ACCESS_TOKEN_COOKIE, "").path("/").finish();
    cookie.make_removal();

    HttpResponse::Ok()
        .cookie(cookie)
        .json(serde_json::json!({ "success": true }))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = UserInfo),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    db: web::Data<MongoDB>,
    user: web::ReqData<AuthUser>,
) -> Result<HttpResponse, AppError> {
    log::info!("👤 GET /auth/me - user: {}", user.user_id);
    Ok(HttpResponse::Ok().json(auth_service::get_current_user(&db, &user.user_id).await?))
}

pub async fn google_login(settings: web::Data<Settings>) -> Result<HttpResponse, AppError> {
    log::info!("🔐 GET /auth/google/login");
    let (url, state) = auth_service::google_auth_url(&settings)?;
    Ok(HttpResponse::Found()
        .insert_header((LOCATION, url))
        .cookie(state_cookie(state, &settings))
        .finish())
}

pub async fn google_redirect(
    req: HttpRequest,
    db: web::Data<MongoDB>,
    settings: web::Data<Settings>,
    query: web::Query<GoogleCallbackQuery>,
) -> HttpResponse {
    log::info!("🔄 GET /auth/google/redirect");

    let issued = req.cookie(OAUTH_STATE_COOKIE);
    let state_check = auth_service::verify_oauth_state(
        issued.as_ref().map(|c| c.value()),
        query.state.as_deref(),
    );

    let result = match (state_check, &query.code, &query.error) {
        (_, _, Some(error)) => Err(AppError::Unauthorized(format!("Google sign-in was denied: {}", error))),
        (Err(e), _, None) => Err(e),
        (Ok(()), Some(code), None) => auth_service::handle_google_callback(&db, &settings, code).await,
        (Ok(()), None, None) => Err(AppError::Validation("Missing authorization code".to_string())),
    };

    match result {
        Ok(response) => {
            log::info!("✅ Google login successful: {}", response.user.user_id);
            let home = format!("{}/home", settings.frontend_url.trim_end_matches('/'));
            HttpResponse::Found()
                .insert_header((LOCATION, home))
                .cookie(access_cookie(response.token, &settings))
                .cookie(cleared_state_cookie())
                .finish()
        }
        Err(e) => {
            log::warn!("❌ Google login failed: {}", e);
            HttpResponse::Found()
                .insert_header((LOCATION, error_redirect_url(&settings.frontend_url, &e.to_string())))
                .cookie(cleared_state_cookie())
                .finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{test_settings, GoogleSettings};
    use actix_web::{http::StatusCode, test, App};

    fn google_settings() -> Settings {
        let mut settings = test_settings();
        settings.google = Some(GoogleSettings {
            client_id: "client".into(),
            client_secret: "secret".into(),
            callback_url: "http://localhost:3001/api/auth/google/redirect".into(),
        });
        settings
    }

    fn location<B>(res: &actix_web::dev::ServiceResponse<B>) -> String {
        res.headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_error_redirect_url_is_encoded() {
        assert_eq!(
            error_redirect_url("http://localhost:3000/", "bad code & more"),
            "http://localhost:3000/auth/error?message=bad%20code%20%26%20more"
        );
    }

    #[actix_rt::test]
    async fn test_logout_clears_cookie() {
        let app = test::init_service(App::new().route("/logout", web::post().to(logout))).await;

        let res = test::call_service(&app, test::TestRequest::post().uri("/logout").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);

        let cookie = res
            .response()
            .cookies()
            .find(|c| c.name() == ACCESS_TOKEN_COOKIE)
            .expect("removal cookie");
        assert_eq!(cookie.value(), "");
    }

    #[actix_rt::test]
    async fn test_google_login_without_configuration_fails() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_settings()))
                .route("/google/login", web::get().to(google_login)),
        )
        .await;

        let req = test::TestRequest::get().uri("/google/login").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_rt::test]
    async fn test_google_login_issues_state_cookie() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(google_settings()))
                .route("/google/login", web::get().to(google_login)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/google/login").to_request()).await;
        assert_eq!(res.status(), StatusCode::FOUND);

        let state = res
            .response()
            .cookies()
            .find(|c| c.name() == OAUTH_STATE_COOKIE)
            .map(|c| c.value().to_string())
            .expect("state cookie");
        assert!(!state.is_empty());
        assert!(location(&res).contains(&format!("state={}", state)));
    }

    #[actix_rt::test]
    async fn test_google_redirect_rejects_unknown_state() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(google_settings()))
                .app_data(web::Data::new(MongoDB::detached().await))
                .route("/google/redirect", web::get().to(google_redirect)),
        )
        .await;

        let forged = test::TestRequest::get()
            .uri("/google/redirect?code=abc&state=forged")
            .cookie(Cookie::new(OAUTH_STATE_COOKIE, "issued"))
            .to_request();
        let res = test::call_service(&app, forged).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            location(&res),
            "http://localhost:3000/auth/error?message=Invalid%20OAuth%20state"
        );

        let missing = test::TestRequest::get()
            .uri("/google/redirect?code=abc&state=issued")
            .to_request();
        let res = test::call_service(&app, missing).await;
        assert!(location(&res).ends_with("message=Invalid%20OAuth%20state"));
    }
}
