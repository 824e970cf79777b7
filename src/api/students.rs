use actix_web::{web, HttpResponse};

use crate::api::deleted;
use crate::database::MongoDB;
use crate::models::{CreateStudentRequest, StudentDetails, StudentFilterQuery, UpdateStudentRequest};
use crate::services::auth_service::AuthUser;
use crate::services::student_service;
use crate::utils::{error::AppError, validation::Validate};

#[utoipa::path(
    post,
    path = "/api/student",
    tag = "Student",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student and user created", body = StudentDetails),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Email, regNo or NIC already registered")
    )
)]
pub async fn create_student(
    db: web::Data<MongoDB>,
    request: web::Json<CreateStudentRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /student - regNo: {}", request.student.reg_no);
    request.validate()?;

    let student = student_service::create_student(&db, &request).await?;
    Ok(HttpResponse::Created().json(student))
}

#[utoipa::path(
    get,
    path = "/api/student",
    tag = "Student",
    responses((status = 200, description = "All students", body = Vec<StudentDetails>))
)]
pub async fn list_students(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /student");
    Ok(HttpResponse::Ok().json(student_service::list_students(&db).await?))
}

pub async fn filter_students(
    db: web::Data<MongoDB>,
    query: web::Query<StudentFilterQuery>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /student/filter - group: {:?}, level: {:?}", query.group, query.level);
    Ok(HttpResponse::Ok().json(student_service::filter_students(&db, &query).await?))
}

#[utoipa::path(
    get,
    path = "/api/student/by-user",
    tag = "Student",
    responses(
        (status = 200, description = "Profile of the signed-in student", body = StudentDetails),
        (status = 404, description = "Student profile not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_my_student(
    db: web::Data<MongoDB>,
    user: web::ReqData<AuthUser>,
) -> Result<HttpResponse, AppError> {
    log::info!("👤 GET /student/by-user - user: {}", user.user_id);
    Ok(HttpResponse::Ok().json(student_service::get_by_user(&db, &user.user_id).await?))
}

pub async fn get_by_user(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    log::info!("🔍 GET /student/by-user/{}", user_id);
    Ok(HttpResponse::Ok().json(student_service::get_by_user(&db, &user_id).await?))
}

pub async fn get_by_reg_no(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let reg_no = path.into_inner();
    log::info!("🔍 GET /student/by-regno/{}", reg_no);
    Ok(HttpResponse::Ok().json(student_service::get_by_reg_no(&db, &reg_no).await?))
}

pub async fn get_student(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let student_id = path.into_inner();
    log::info!("🔍 GET /student/{}", student_id);
    Ok(HttpResponse::Ok().json(student_service::get_student(&db, &student_id).await?))
}

pub async fn update_student(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<UpdateStudentRequest>,
) -> Result<HttpResponse, AppError> {
    let student_id = path.into_inner();
    log::info!("✏️  PATCH /student/{}", student_id);
    request.validate()?;
    Ok(HttpResponse::Ok().json(student_service::update_student(&db, &student_id, &request).await?))
}

pub async fn delete_student(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let student_id = path.into_inner();
    log::info!("🗑️  DELETE /student/{}", student_id);
    student_service::delete_student(&db, &student_id).await?;
    Ok(deleted(format!("Student with ID {} deleted", student_id)))
}
