use actix_web::{web, HttpResponse};

use crate::api::deleted;
use crate::database::MongoDB;
use crate::models::{CreateStallRequest, StallDetails, UpdateStallRequest};
use crate::services::stall_service;
use crate::utils::{error::AppError, validation::Validate};

#[utoipa::path(
    post,
    path = "/api/stall",
    tag = "Stall",
    request_body = CreateStallRequest,
    responses(
        (status = 201, description = "Stall created", body = StallDetails),
        (status = 404, description = "Room or company not found")
    )
)]
pub async fn create_stall(
    db: web::Data<MongoDB>,
    request: web::Json<CreateStallRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /stall - {}", request.title);
    request.validate()?;
    Ok(HttpResponse::Created().json(stall_service::create_stall(&db, &request).await?))
}

pub async fn list_stalls(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /stall");
    Ok(HttpResponse::Ok().json(stall_service::list_stalls(&db).await?))
}

pub async fn list_by_room(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    log::info!("🔍 GET /stall/room/{}", room_id);
    Ok(HttpResponse::Ok().json(stall_service::list_by_room(&db, &room_id).await?))
}

pub async fn list_by_company(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let company_id = path.into_inner();
    log::info!("🔍 GET /stall/company/{}", company_id);
    Ok(HttpResponse::Ok().json(stall_service::list_by_company(&db, &company_id).await?))
}

pub async fn get_stall(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let stall_id = path.into_inner();
    log::info!("🔍 GET /stall/{}", stall_id);
    Ok(HttpResponse::Ok().json(stall_service::get_stall(&db, &stall_id).await?))
}

pub async fn update_stall(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<UpdateStallRequest>,
) -> Result<HttpResponse, AppError> {
    let stall_id = path.into_inner();
    log::info!("✏️  PATCH /stall/{}", stall_id);
    request.validate()?;
    Ok(HttpResponse::Ok().json(stall_service::update_stall(&db, &stall_id, &request).await?))
}

pub async fn delete_stall(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let stall_id = path.into_inner();
    log::info!("🗑️  DELETE /stall/{}", stall_id);
    let message = stall_service::delete_stall(&db, &stall_id).await?;
    Ok(deleted(message))
}
