use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::config::Settings;
use crate::database::MongoDB;
use crate::services::auth_service::{self, AuthUser, ACCESS_TOKEN_COOKIE};
use crate::services::user_service;
use crate::utils::error::AppError;

/// Rejects requests without a valid JWT whose user still exists.
/// On success the caller is available to handlers as `web::ReqData<AuthUser>`.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let user = authenticate(&req).await.map_err(|e| {
                log::warn!("🔒 Rejected {} {}: {}", req.method(), req.path(), e);
                Error::from(e)
            })?;

            req.extensions_mut().insert(user);
            service.call(req).await
        })
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<AuthUser, AppError> {
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let cookie = req.cookie(ACCESS_TOKEN_COOKIE);

    let token = auth_service::extract_token(authorization, cookie.as_ref().map(|c| c.value()))
        .ok_or_else(|| AppError::Unauthorized("Missing authentication token".to_string()))?;

    let settings = req
        .app_data::<web::Data<Settings>>()
        .ok_or_else(|| AppError::Internal("Settings are not registered".to_string()))?;
    let claims = auth_service::verify_token(&token, settings)?;

    let db = req
        .app_data::<web::Data<MongoDB>>()
        .ok_or_else(|| AppError::Internal("Database is not registered".to_string()))?;
    let user = user_service::find_user(db, &claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    Ok(AuthUser {
        user_id: user.user_id,
        email: user.email,
        role: user.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_settings;
    use actix_web::{http::StatusCode, test, App, HttpResponse};

    async fn protected() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    // Middleware rejections surface as service errors, not responses
    macro_rules! status_of {
        ($app:expr, $req:expr) => {
            match test::try_call_service(&$app, $req).await {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            }
        };
    }

    #[actix_rt::test]
    async fn test_missing_token_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_settings()))
                .service(web::resource("/me").wrap(AuthMiddleware).to(protected)),
        )
        .await;

        let req = test::TestRequest::get().uri("/me").to_request();
        assert_eq!(status_of!(app, req), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_bad_token_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_settings()))
                .service(web::resource("/me").wrap(AuthMiddleware).to(protected)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((AUTHORIZATION, "Bearer not-a-jwt"))
            .to_request();
        assert_eq!(status_of!(app, req), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/me")
            .cookie(actix_web::cookie::Cookie::new(ACCESS_TOKEN_COOKIE, "garbage"))
            .to_request();
        assert_eq!(status_of!(app, req), StatusCode::UNAUTHORIZED);
    }
}
