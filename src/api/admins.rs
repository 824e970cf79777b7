use actix_web::{web, HttpResponse};

use crate::api::deleted;
use crate::database::MongoDB;
use crate::models::{AdminDetails, CreateAdminRequest, UpdateAdminRequest};
use crate::services::admin_service;
use crate::services::auth_service::AuthUser;
use crate::utils::{error::AppError, validation::Validate};

#[utoipa::path(
    post,
    path = "/api/admin",
    tag = "Admin",
    request_body = CreateAdminRequest,
    responses(
        (status = 201, description = "Admin created", body = AdminDetails),
        (status = 409, description = "Email already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_admin(
    db: web::Data<MongoDB>,
    request: web::Json<CreateAdminRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /admin - email: {}", request.user.email);
    request.validate()?;
    Ok(HttpResponse::Created().json(admin_service::create_admin(&db, &request).await?))
}

pub async fn list_admins(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /admin");
    Ok(HttpResponse::Ok().json(admin_service::list_admins(&db).await?))
}

/// Serves both `/admin/by-user` and `/admin/profile`.
pub async fn get_my_admin(
    db: web::Data<MongoDB>,
    user: web::ReqData<AuthUser>,
) -> Result<HttpResponse, AppError> {
    log::info!("👤 GET /admin/profile - user: {}", user.user_id);
    Ok(HttpResponse::Ok().json(admin_service::get_by_user(&db, &user.user_id).await?))
}

pub async fn get_admin(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let admin_id = path.into_inner();
    log::info!("🔍 GET /admin/{}", admin_id);
    Ok(HttpResponse::Ok().json(admin_service::get_admin(&db, &admin_id).await?))
}

pub async fn update_admin(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<UpdateAdminRequest>,
) -> Result<HttpResponse, AppError> {
    let admin_id = path.into_inner();
    log::info!("✏️  PATCH /admin/{}", admin_id);
    request.validate()?;
    Ok(HttpResponse::Ok().json(admin_service::update_admin(&db, &admin_id, &request).await?))
}

pub async fn delete_admin(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let admin_id = path.into_inner();
    log::info!("🗑️  DELETE /admin/{}", admin_id);
    admin_service::delete_admin(&db, &admin_id).await?;
    Ok(deleted(format!("Admin with ID {} deleted", admin_id)))
}
