use actix_web::http::header::CONTENT_DISPOSITION;
use actix_web::{web, HttpResponse};

use crate::api::deleted;
use crate::database::MongoDB;
use crate::models::{JobPostDetails, UploadJobPostRequest, PDF_MIME_TYPE};
use crate::services::{job_post_service, PdfStorage};
use crate::utils::error::AppError;

#[utoipa::path(
    post,
    path = "/api/job-posts/upload",
    tag = "Job Posts",
    request_body = UploadJobPostRequest,
    responses(
        (status = 201, description = "Job post stored", body = JobPostDetails),
        (status = 400, description = "Missing file or company, not a PDF, or too large"),
        (status = 404, description = "Company not found")
    )
)]
pub async fn upload_job_post(
    db: web::Data<MongoDB>,
    storage: web::Data<PdfStorage>,
    request: web::Json<UploadJobPostRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📤 POST /job-posts/upload - company: {:?}", request.company_id);
    Ok(HttpResponse::Created().json(job_post_service::upload_job_post(&db, &storage, &request).await?))
}

pub async fn list_job_posts(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /job-posts");
    Ok(HttpResponse::Ok().json(job_post_service::list_job_posts(&db).await?))
}

pub async fn list_by_company(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let company_id = path.into_inner();
    log::info!("🔍 GET /job-posts/company/{}", company_id);
    Ok(HttpResponse::Ok().json(job_post_service::list_by_company(&db, &company_id).await?))
}

pub async fn get_job_post(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let job_post_id = path.into_inner();
    log::info!("🔍 GET /job-posts/{}", job_post_id);
    Ok(HttpResponse::Ok().json(job_post_service::get_job_post(&db, &job_post_id).await?))
}

pub async fn download_job_post(
    db: web::Data<MongoDB>,
    storage: web::Data<PdfStorage>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let job_post_id = path.into_inner();
    log::info!("📥 GET /job-posts/{}/download", job_post_id);

    let (file_name, bytes) = job_post_service::download(&db, &storage, &job_post_id).await?;
    Ok(HttpResponse::Ok()
        .content_type(PDF_MIME_TYPE)
        .insert_header((CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file_name)))
        .body(bytes))
}

pub async fn delete_job_post(
    db: web::Data<MongoDB>,
    storage: web::Data<PdfStorage>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let job_post_id = path.into_inner();
    log::info!("🗑️  DELETE /job-posts/{}", job_post_id);
    job_post_service::delete_job_post(&db, &storage, &job_post_id).await?;
    Ok(deleted(format!("Job post with ID {} deleted", job_post_id)))
}
