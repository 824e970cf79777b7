use actix_web::{web, HttpResponse};

use crate::api::deleted;
use crate::database::MongoDB;
use crate::models::{CreateFeedbackRequest, FeedbackView, UpdateFeedbackRequest, UserRole};
use crate::services::auth_service::AuthUser;
use crate::services::feedback_service;
use crate::utils::{error::AppError, validation::Validate};

#[utoipa::path(
    post,
    path = "/api/feedback",
    tag = "Feedback",
    request_body = CreateFeedbackRequest,
    responses(
        (status = 201, description = "Feedback stored", body = FeedbackView),
        (status = 400, description = "Rating must be between 1 and 5")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_feedback(
    db: web::Data<MongoDB>,
    user: web::ReqData<AuthUser>,
    request: web::Json<CreateFeedbackRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /feedback - user: {}", user.user_id);
    request.validate()?;
    Ok(HttpResponse::Created().json(feedback_service::create_feedback(&db, &user.user_id, &request).await?))
}

pub async fn list_feedback(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /feedback");
    Ok(HttpResponse::Ok().json(feedback_service::list_feedback(&db).await?))
}

pub async fn list_from_students(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /feedback/students");
    Ok(HttpResponse::Ok().json(feedback_service::list_by_role(&db, UserRole::Student).await?))
}

pub async fn list_from_companies(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /feedback/companies");
    Ok(HttpResponse::Ok().json(feedback_service::list_by_role(&db, UserRole::Company).await?))
}

pub async fn get_feedback(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let feedback_id = path.into_inner();
    log::info!("🔍 GET /feedback/{}", feedback_id);
    Ok(HttpResponse::Ok().json(feedback_service::get_feedback(&db, &feedback_id).await?))
}

pub async fn update_feedback(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<UpdateFeedbackRequest>,
) -> Result<HttpResponse, AppError> {
    let feedback_id = path.into_inner();
    log::info!("✏️  PATCH /feedback/{}", feedback_id);
    request.validate()?;
    Ok(HttpResponse::Ok().json(feedback_service::update_feedback(&db, &feedback_id, &request).await?))
}

pub async fn delete_feedback(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let feedback_id = path.into_inner();
    log::info!("🗑️  DELETE /feedback/{}", feedback_id);
    feedback_service::delete_feedback(&db, &feedback_id).await?;
    Ok(deleted(format!("Feedback with ID {} deleted", feedback_id)))
}
