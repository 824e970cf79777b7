use actix_web::{web, HttpResponse};

use crate::api::deleted;
use crate::database::MongoDB;
use crate::models::{CreateCvByRegNoRequest, CreateCvRequest, StudentCvDetails, UpdateCvRequest};
use crate::services::cv_service;
use crate::utils::{error::AppError, validation::Validate};

pub async fn create_cv(
    db: web::Data<MongoDB>,
    request: web::Json<CreateCvRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /cv - student: {}", request.student_id);
    request.validate()?;
    Ok(HttpResponse::Created().json(cv_service::create_cv(&db, &request).await?))
}

#[utoipa::path(
    post,
    path = "/api/cv/by-regno",
    tag = "CV",
    request_body = CreateCvByRegNoRequest,
    responses(
        (status = 201, description = "CV registered", body = StudentCvDetails),
        (status = 404, description = "Unknown registration number"),
        (status = 409, description = "Same file already registered for the student")
    )
)]
pub async fn create_by_reg_no(
    db: web::Data<MongoDB>,
    request: web::Json<CreateCvByRegNoRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /cv/by-regno - regNo: {}", request.reg_no);
    request.validate()?;
    Ok(HttpResponse::Created().json(cv_service::create_by_reg_no(&db, &request).await?))
}

pub async fn list_cvs(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /cv");
    Ok(HttpResponse::Ok().json(cv_service::list_cvs(&db).await?))
}

pub async fn get_cv(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let cv_id = path.into_inner();
    log::info!("🔍 GET /cv/{}", cv_id);
    Ok(HttpResponse::Ok().json(cv_service::get_cv(&db, &cv_id).await?))
}

pub async fn latest_for_student(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let student_id = path.into_inner();
    log::info!("🔍 GET /cv/student/{}", student_id);
    Ok(HttpResponse::Ok().json(cv_service::latest_for_student(&db, &student_id).await?))
}

pub async fn list_for_student(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let student_id = path.into_inner();
    log::info!("🔍 GET /cv/student/{}/list", student_id);
    Ok(HttpResponse::Ok().json(cv_service::list_for_student(&db, &student_id).await?))
}

pub async fn update_cv(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<UpdateCvRequest>,
) -> Result<HttpResponse, AppError> {
    let cv_id = path.into_inner();
    log::info!("✏️  PATCH /cv/{}", cv_id);
    request.validate()?;
    Ok(HttpResponse::Ok().json(cv_service::update_cv(&db, &cv_id, &request).await?))
}

pub async fn delete_cv(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let cv_id = path.into_inner();
    log::info!("🗑️  DELETE /cv/{}", cv_id);
    cv_service::delete_cv(&db, &cv_id).await?;
    Ok(deleted("CV deleted successfully"))
}
