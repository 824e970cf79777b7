use actix_web::{web, HttpResponse};

use crate::api::deleted;
use crate::database::MongoDB;
use crate::models::{CreateShortlistRequest, ShortlistDetails, UpdateShortlistRequest};
use crate::services::shortlist_service;
use crate::utils::{error::AppError, validation::Validate};

#[utoipa::path(
    post,
    path = "/api/shortlist",
    tag = "Shortlist",
    request_body = CreateShortlistRequest,
    responses(
        (status = 201, description = "Student shortlisted", body = ShortlistDetails),
        (status = 400, description = "companyID, studentID and description are required"),
        (status = 404, description = "Company or student not found"),
        (status = 409, description = "Student is already shortlisted for this company")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_shortlist(
    db: web::Data<MongoDB>,
    request: web::Json<CreateShortlistRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "📝 POST /shortlist - company: {:?}, student: {:?}",
        request.company_id,
        request.student_id
    );
    Ok(HttpResponse::Created().json(shortlist_service::create_shortlist(&db, &request).await?))
}

pub async fn list_shortlists(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /shortlist");
    Ok(HttpResponse::Ok().json(shortlist_service::list_shortlists(&db).await?))
}

pub async fn list_by_student(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let student_id = path.into_inner();
    log::info!("🔍 GET /shortlist/student/{}", student_id);
    Ok(HttpResponse::Ok().json(shortlist_service::list_by_student(&db, &student_id).await?))
}

pub async fn list_by_company(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let company_id = path.into_inner();
    log::info!("🔍 GET /shortlist/company/{}", company_id);
    Ok(HttpResponse::Ok().json(shortlist_service::list_by_company(&db, &company_id).await?))
}

pub async fn get_shortlist(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let shortlist_id = path.into_inner();
    log::info!("🔍 GET /shortlist/{}", shortlist_id);
    Ok(HttpResponse::Ok().json(shortlist_service::get_shortlist(&db, &shortlist_id).await?))
}

pub async fn update_shortlist(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<UpdateShortlistRequest>,
) -> Result<HttpResponse, AppError> {
    let shortlist_id = path.into_inner();
    log::info!("✏️  PATCH /shortlist/{}", shortlist_id);
    request.validate()?;
    Ok(HttpResponse::Ok().json(shortlist_service::update_shortlist(&db, &shortlist_id, &request).await?))
}

pub async fn delete_shortlist(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let shortlist_id = path.into_inner();
    log::info!("🗑️  DELETE /shortlist/{}", shortlist_id);
    let message = shortlist_service::delete_shortlist(&db, &shortlist_id).await?;
    Ok(deleted(message))
}
