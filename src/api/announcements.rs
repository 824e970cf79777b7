use actix_web::{web, HttpResponse};

use crate::api::deleted;
use crate::database::MongoDB;
use crate::models::{
    AnnouncementView, AudienceQuery, AudienceType, CountResponse, CreateAnnouncementRequest,
    UpdateAnnouncementRequest,
};
use crate::services::announcement_service;
use crate::services::auth_service::AuthUser;
use crate::utils::{error::AppError, validation::Validate};

#[utoipa::path(
    post,
    path = "/api/announcement",
    tag = "Announcement",
    request_body = CreateAnnouncementRequest,
    responses((status = 201, description = "Announcement posted", body = AnnouncementView)),
    security(("bearer_auth" = []))
)]
pub async fn create_announcement(
    db: web::Data<MongoDB>,
    user: web::ReqData<AuthUser>,
    request: web::Json<CreateAnnouncementRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /announcement - user: {}", user.user_id);
    request.validate()?;
    Ok(HttpResponse::Created().json(
        announcement_service::create_announcement(&db, &user.user_id, &request).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/announcement",
    tag = "Announcement",
    responses((status = 200, description = "Newest first", body = Vec<AnnouncementView>))
)]
pub async fn list_announcements(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /announcement");
    Ok(HttpResponse::Ok().json(announcement_service::list_announcements(&db).await?))
}

pub async fn list_for_students(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /announcement/students");
    Ok(HttpResponse::Ok().json(announcement_service::list_for_audience(&db, AudienceType::Students).await?))
}

pub async fn list_for_companies(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /announcement/companies");
    Ok(HttpResponse::Ok().json(announcement_service::list_for_audience(&db, AudienceType::Companies).await?))
}

pub async fn list_mine(db: web::Data<MongoDB>, user: web::ReqData<AuthUser>) -> Result<HttpResponse, AppError> {
    log::info!("👤 GET /announcement/user - user: {}", user.user_id);
    Ok(HttpResponse::Ok().json(announcement_service::list_by_user(&db, &user.user_id).await?))
}

pub async fn list_by_user(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    log::info!("🔍 GET /announcement/user/{}", user_id);
    Ok(HttpResponse::Ok().json(announcement_service::list_by_user(&db, &user_id).await?))
}

pub async fn count_announcements(
    db: web::Data<MongoDB>,
    query: web::Query<AudienceQuery>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔢 GET /announcement/count - audience: {:?}", query.audience);
    let count = announcement_service::count(&db, query.audience).await?;
    Ok(HttpResponse::Ok().json(CountResponse { count }))
}

pub async fn get_announcement(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let announcement_id = path.into_inner();
    log::info!("🔍 GET /announcement/{}", announcement_id);
    Ok(HttpResponse::Ok().json(announcement_service::get_announcement(&db, &announcement_id).await?))
}

pub async fn update_announcement(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<UpdateAnnouncementRequest>,
) -> Result<HttpResponse, AppError> {
    let announcement_id = path.into_inner();
    log::info!("✏️  PATCH /announcement/{}", announcement_id);
    request.validate()?;
    Ok(HttpResponse::Ok().json(
        announcement_service::update_announcement(&db, &announcement_id, &request).await?,
    ))
}

pub async fn delete_announcement(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let announcement_id = path.into_inner();
    log::info!("🗑️  DELETE /announcement/{}", announcement_id);
    announcement_service::delete_announcement(&db, &announcement_id).await?;
    Ok(deleted(format!("Announcement with ID {} deleted", announcement_id)))
}
