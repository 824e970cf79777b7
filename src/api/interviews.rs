use actix_web::{web, HttpResponse};

use crate::api::deleted;
use crate::database::MongoDB;
use crate::models::{
    CountResponse, CreateInterviewByRegNoRequest, CreateInterviewRequest, InterviewDetails, InterviewStatus,
    NextWalkinQuery, StudentPreferenceRequest, UpdateInterviewRequest, UpdatedResponse,
};
use crate::services::interview_service;
use crate::utils::{error::AppError, validation::Validate};

// ==================== CREATE ====================

#[utoipa::path(
    post,
    path = "/api/interview",
    tag = "Interview",
    request_body = CreateInterviewRequest,
    responses(
        (status = 201, description = "Interview created", body = InterviewDetails),
        (status = 404, description = "Student, company or stall not found"),
        (status = 409, description = "An interview already exists for this student and company")
    )
)]
pub async fn create_interview(
    db: web::Data<MongoDB>,
    request: web::Json<CreateInterviewRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "📝 POST /interview - student: {}, company: {}, type: {}",
        request.student_id,
        request.company_id,
        request.interview_type.as_str()
    );
    request.validate()?;
    Ok(HttpResponse::Created().json(interview_service::create_interview(&db, &request).await?))
}

pub async fn bulk_create(
    db: web::Data<MongoDB>,
    items: web::Json<Vec<serde_json::Value>>,
) -> Result<HttpResponse, AppError> {
    log::info!("📦 POST /interview/bulk - {} interviews", items.len());
    Ok(HttpResponse::Created().json(interview_service::bulk_create(&db, items.into_inner()).await))
}

pub async fn bulk_create_prelist(
    db: web::Data<MongoDB>,
    items: web::Json<Vec<serde_json::Value>>,
) -> Result<HttpResponse, AppError> {
    log::info!("📦 POST /interview/prelist/bulk - {} interviews", items.len());
    let result = interview_service::bulk_create_prelist(&db, items.into_inner()).await?;
    Ok(HttpResponse::Created().json(result))
}

pub async fn create_by_reg_no(
    db: web::Data<MongoDB>,
    request: web::Json<CreateInterviewByRegNoRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /interview/by-regno - regNo: {}", request.reg_no);
    request.validate()?;
    Ok(HttpResponse::Created().json(interview_service::create_by_reg_no(&db, &request).await?))
}

// ==================== READ ====================

pub async fn list_interviews(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /interview");
    Ok(HttpResponse::Ok().json(interview_service::list_interviews(&db).await?))
}

pub async fn get_interview(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let interview_id = path.into_inner();
    log::info!("🔍 GET /interview/{}", interview_id);
    Ok(HttpResponse::Ok().json(interview_service::get_interview(&db, &interview_id).await?))
}

pub async fn list_by_student(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let student_id = path.into_inner();
    log::info!("🔍 GET /interview/student/{}", student_id);
    Ok(HttpResponse::Ok().json(interview_service::list_by_student(&db, &student_id).await?))
}

pub async fn list_by_company(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let company_id = path.into_inner();
    log::info!("🔍 GET /interview/company/{}", company_id);
    Ok(HttpResponse::Ok().json(interview_service::list_by_company(&db, &company_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/interview/company/{id}/prelisted",
    tag = "Interview",
    params(("id" = String, Path, description = "Company ID")),
    responses((
        status = 200,
        description = "Pre-listed interviews by student then company preference",
        body = Vec<InterviewDetails>
    ))
)]
pub async fn list_prelisted(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let company_id = path.into_inner();
    log::info!("🔍 GET /interview/company/{}/prelisted", company_id);
    Ok(HttpResponse::Ok().json(interview_service::list_prelisted_by_company(&db, &company_id).await?))
}

pub async fn list_prelisted_in_queue(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let company_id = path.into_inner();
    log::info!("🔍 GET /interview/company/{}/prelisted/inqueue", company_id);
    Ok(HttpResponse::Ok().json(
        interview_service::list_prelisted_in_queue_by_company(&db, &company_id).await?,
    ))
}

pub async fn list_walkins(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let company_id = path.into_inner();
    log::info!("🔍 GET /interview/company/{}/walkin", company_id);
    Ok(HttpResponse::Ok().json(interview_service::list_walkins_by_company(&db, &company_id).await?))
}

pub async fn count_waiting_walkins(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let company_id = path.into_inner();
    log::info!("🔢 GET /interview/company/{}/walkin/count", company_id);
    let count = interview_service::count_waiting_walkins(&db, &company_id).await?;
    Ok(HttpResponse::Ok().json(CountResponse { count }))
}

/// Serves both `/interview/stall/{id}` and `/interview/stall/{id}/inqueue`.
pub async fn list_in_queue_by_stall(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let stall_id = path.into_inner();
    log::info!("🔍 GET /interview/stall/{}/inqueue", stall_id);
    Ok(HttpResponse::Ok().json(interview_service::list_in_queue_by_stall(&db, &stall_id).await?))
}

pub async fn count_walkins_at_stall(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let stall_id = path.into_inner();
    log::info!("🔢 GET /interview/stall/{}/walkin/count", stall_id);
    let count = interview_service::count_walkins_at_stall(&db, &stall_id).await?;
    Ok(HttpResponse::Ok().json(CountResponse { count }))
}

// ==================== QUEUE ====================

#[utoipa::path(
    get,
    path = "/api/interview/company/{company_id}/stall/{stall_id}/next-walkin",
    tag = "Interview",
    params(
        ("company_id" = String, Path, description = "Company ID"),
        ("stall_id" = String, Path, description = "Stall pulling the walk-ins"),
        ("count" = Option<u32>, Query, description = "How many walk-ins to claim, default 1")
    ),
    responses(
        (status = 200, description = "Walk-ins claimed for the stall", body = Vec<InterviewDetails>),
        (status = 400, description = "count must be at least 1"),
        (status = 404, description = "Stall not found")
    )
)]
pub async fn next_walkins(
    db: web::Data<MongoDB>,
    path: web::Path<(String, String)>,
    query: web::Query<NextWalkinQuery>,
) -> Result<HttpResponse, AppError> {
    let (company_id, stall_id) = path.into_inner();
    let count = query.count.unwrap_or(1) as usize;
    log::info!(
        "🎯 GET /interview/company/{}/stall/{}/next-walkin - count: {}",
        company_id,
        stall_id,
        count
    );

    let claimed = interview_service::assign_next_walkins(&db, &company_id, &stall_id, count).await?;
    log::info!("✅ Assigned {} walk-in(s) to stall {}", claimed.len(), stall_id);
    Ok(HttpResponse::Ok().json(claimed))
}

pub async fn clear_walkins(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let stall_id = path.into_inner();
    log::info!("🧹 PATCH /interview/stall/{}/clear-walkins", stall_id);
    let updated = interview_service::clear_walkins_from_stall(&db, &stall_id).await?;
    Ok(HttpResponse::Ok().json(UpdatedResponse { updated }))
}

// ==================== UPDATE ====================

pub async fn update_interview(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<UpdateInterviewRequest>,
) -> Result<HttpResponse, AppError> {
    let interview_id = path.into_inner();
    log::info!("✏️  PATCH /interview/{}", interview_id);
    request.validate()?;
    Ok(HttpResponse::Ok().json(interview_service::update_interview(&db, &interview_id, &request).await?))
}

async fn transition(db: &MongoDB, interview_id: String, status: InterviewStatus) -> Result<HttpResponse, AppError> {
    log::info!("🔄 PATCH /interview/{} -> {}", interview_id, status.as_str());
    Ok(HttpResponse::Ok().json(interview_service::set_status(db, &interview_id, status).await?))
}

pub async fn schedule(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    transition(&db, path.into_inner(), InterviewStatus::Scheduled).await
}

pub async fn complete(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    transition(&db, path.into_inner(), InterviewStatus::Completed).await
}

pub async fn cancel(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    transition(&db, path.into_inner(), InterviewStatus::Cancelled).await
}

pub async fn set_student_preference(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<StudentPreferenceRequest>,
) -> Result<HttpResponse, AppError> {
    let interview_id = path.into_inner();
    log::info!(
        "✏️  PATCH /interview/{}/student-preference - {}",
        interview_id,
        request.student_preference
    );
    Ok(HttpResponse::Ok().json(
        interview_service::set_student_preference(&db, &interview_id, request.student_preference).await?,
    ))
}

// ==================== DELETE ====================

pub async fn delete_interview(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let interview_id = path.into_inner();
    log::info!("🗑️  DELETE /interview/{}", interview_id);
    interview_service::delete_interview(&db, &interview_id).await?;
    Ok(deleted(format!("Interview with ID {} deleted", interview_id)))
}

pub async fn delete_prelisted(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let interview_id = path.into_inner();
    log::info!("🗑️  DELETE /interview/prelisted/{}", interview_id);
    interview_service::delete_prelisted(&db, &interview_id).await?;
    Ok(deleted(format!(
        "Pre-listed interview with ID {} deleted and queue renumbered",
        interview_id
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, http::StatusCode, test, App};
    use serde_json::json;

    #[actix_rt::test]
    async fn test_next_walkin_rejects_zero_count() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(MongoDB::detached().await))
                .route(
                    "/interview/company/{cid}/stall/{sid}/next-walkin",
                    web::get().to(next_walkins),
                ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/interview/company/c1/stall/s1/next-walkin?count=0")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/interview/company/c1/stall/s1/next-walkin?count=-2")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_bulk_reports_malformed_items_individually() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(MongoDB::detached().await))
                .route("/interview/bulk", web::post().to(bulk_create))
                .route("/interview/prelist/bulk", web::post().to(bulk_create_prelist)),
        )
        .await;

        let batch = json!([
            { "companyID": "c1", "studentID": "s1", "type": "walkin" },
            { "companyID": "c1", "studentID": "", "type": "walk-in" },
            "not an interview"
        ]);

        for uri in ["/interview/bulk", "/interview/prelist/bulk"] {
            let req = test::TestRequest::post().uri(uri).set_json(&batch).to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::CREATED);

            let body: serde_json::Value = serde_json::from_slice(&to_bytes(res.into_body()).await.unwrap()).unwrap();
            assert_eq!(body["summary"]["total"], 3);
            assert_eq!(body["summary"]["failed"], 3);
            assert_eq!(body["failed"][0]["index"], 0);
            assert_eq!(body["failed"][2]["index"], 2);
            assert!(body["failed"][0]["error"].as_str().unwrap().contains("walkin"));
        }
    }
}
