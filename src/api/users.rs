use actix_web::{web, HttpResponse};

use crate::database::MongoDB;
use crate::models::{CreateUserRequest, UserInfo};
use crate::services::user_service;
use crate::utils::{error::AppError, validation::Validate};

#[utoipa::path(
    post,
    path = "/api/user",
    tag = "User",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserInfo),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn create_user(
    db: web::Data<MongoDB>,
    request: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /user - email: {}", request.email);
    request.validate()?;
    let role = request
        .role
        .ok_or_else(|| AppError::Validation("role is required".to_string()))?;

    let user = user_service::create_user(&db, &request, role).await?;
    log::info!("✅ User created: {} ({})", user.user_id, role);
    Ok(HttpResponse::Created().json(UserInfo::from(user)))
}

#[utoipa::path(
    get,
    path = "/api/user",
    tag = "User",
    responses((status = 200, description = "All users", body = Vec<UserInfo>))
)]
pub async fn list_users(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /user");
    Ok(HttpResponse::Ok().json(user_service::list_users(&db).await?))
}

#[utoipa::path(
    get,
    path = "/api/user/{id}",
    tag = "User",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserInfo),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    log::info!("🔍 GET /user/{}", user_id);
    Ok(HttpResponse::Ok().json(user_service::get_user(&db, &user_id).await?))
}
