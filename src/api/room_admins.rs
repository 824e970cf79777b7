use actix_web::{web, HttpResponse};

use crate::api::deleted;
use crate::database::MongoDB;
use crate::models::{CreateRoomAdminRequest, RoomAdminDetails, UpdateRoomAdminRequest};
use crate::services::auth_service::AuthUser;
use crate::services::room_service;
use crate::utils::{error::AppError, validation::Validate};

#[utoipa::path(
    post,
    path = "/api/room-admin",
    tag = "Room Admin",
    request_body = CreateRoomAdminRequest,
    responses(
        (status = 201, description = "Room admin created", body = RoomAdminDetails),
        (status = 404, description = "Room not found"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn create_room_admin(
    db: web::Data<MongoDB>,
    request: web::Json<CreateRoomAdminRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /room-admin - email: {}", request.user.email);
    request.validate()?;
    Ok(HttpResponse::Created().json(room_service::create_room_admin(&db, &request).await?))
}

pub async fn list_room_admins(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /room-admin");
    Ok(HttpResponse::Ok().json(room_service::list_room_admins(&db).await?))
}

pub async fn get_my_room_admin(
    db: web::Data<MongoDB>,
    user: web::ReqData<AuthUser>,
) -> Result<HttpResponse, AppError> {
    log::info!("👤 GET /room-admin/by-user - user: {}", user.user_id);
    Ok(HttpResponse::Ok().json(room_service::get_room_admin_by_user(&db, &user.user_id).await?))
}

pub async fn get_by_user(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    log::info!("🔍 GET /room-admin/by-user/{}", user_id);
    Ok(HttpResponse::Ok().json(room_service::get_room_admin_by_user(&db, &user_id).await?))
}

pub async fn list_by_room(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    log::info!("🔍 GET /room-admin/by-room/{}", room_id);
    Ok(HttpResponse::Ok().json(room_service::list_room_admins_by_room(&db, &room_id).await?))
}

pub async fn get_room_admin(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let room_admin_id = path.into_inner();
    log::info!("🔍 GET /room-admin/{}", room_admin_id);
    Ok(HttpResponse::Ok().json(room_service::get_room_admin(&db, &room_admin_id).await?))
}

pub async fn update_room_admin(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<UpdateRoomAdminRequest>,
) -> Result<HttpResponse, AppError> {
    let room_admin_id = path.into_inner();
    log::info!("✏️  PATCH /room-admin/{}", room_admin_id);
    request.validate()?;
    Ok(HttpResponse::Ok().json(room_service::update_room_admin(&db, &room_admin_id, &request).await?))
}

pub async fn delete_room_admin(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let room_admin_id = path.into_inner();
    log::info!("🗑️  DELETE /room-admin/{}", room_admin_id);
    room_service::delete_room_admin(&db, &room_admin_id).await?;
    Ok(deleted(format!("Room admin with ID {} deleted", room_admin_id)))
}
