use actix_web::{web, HttpResponse};

use crate::api::deleted;
use crate::database::MongoDB;
use crate::models::{CompanyDetails, CompanyFilterQuery, CompanyName, CreateCompanyRequest, UpdateCompanyRequest};
use crate::services::auth_service::AuthUser;
use crate::services::company_service;
use crate::utils::{error::AppError, validation::Validate};

async fn create(db: &MongoDB, request: &CreateCompanyRequest) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let company = company_service::create_company(db, request).await?;
    log::info!("✅ Company registered: {}", company.company.company_name);
    Ok(HttpResponse::Created().json(company))
}

#[utoipa::path(
    post,
    path = "/api/company/register",
    tag = "Company",
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "Company and account created", body = CompanyDetails),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn register_company(
    db: web::Data<MongoDB>,
    request: web::Json<CreateCompanyRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /company/register - {}", request.company.company_name);
    create(&db, &request).await
}

pub async fn create_company(
    db: web::Data<MongoDB>,
    request: web::Json<CreateCompanyRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /company - {}", request.company.company_name);
    create(&db, &request).await
}

pub async fn bulk_create_companies(
    db: web::Data<MongoDB>,
    items: web::Json<Vec<serde_json::Value>>,
) -> Result<HttpResponse, AppError> {
    log::info!("📦 POST /company/bulk - {} companies", items.len());
    let result = company_service::bulk_create(&db, items.into_inner()).await;
    Ok(HttpResponse::Created().json(result))
}

#[utoipa::path(
    get,
    path = "/api/company",
    tag = "Company",
    responses((status = 200, description = "All companies", body = Vec<CompanyDetails>)),
    security(("bearer_auth" = []))
)]
pub async fn list_companies(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /company");
    Ok(HttpResponse::Ok().json(company_service::list_companies(&db).await?))
}

pub async fn filter_companies(
    db: web::Data<MongoDB>,
    query: web::Query<CompanyFilterQuery>,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "🔍 GET /company/filter - location: {:?}, sponsership: {:?}",
        query.location,
        query.sponsership
    );
    Ok(HttpResponse::Ok().json(company_service::filter_companies(&db, &query).await?))
}

#[utoipa::path(
    get,
    path = "/api/company/name",
    tag = "Company",
    responses((status = 200, description = "ID and name of every company", body = Vec<CompanyName>)),
    security(("bearer_auth" = []))
)]
pub async fn list_company_names(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /company/name");
    Ok(HttpResponse::Ok().json(company_service::list_names(&db).await?))
}

pub async fn get_my_company(
    db: web::Data<MongoDB>,
    user: web::ReqData<AuthUser>,
) -> Result<HttpResponse, AppError> {
    log::info!("👤 GET /company/by-user - user: {}", user.user_id);
    Ok(HttpResponse::Ok().json(company_service::get_by_user(&db, &user.user_id).await?))
}

pub async fn get_by_user(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    log::info!("🔍 GET /company/by-user/{}", user_id);
    Ok(HttpResponse::Ok().json(company_service::get_by_user(&db, &user_id).await?))
}

pub async fn get_company(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let company_id = path.into_inner();
    log::info!("🔍 GET /company/{}", company_id);
    Ok(HttpResponse::Ok().json(company_service::get_company(&db, &company_id).await?))
}

pub async fn update_company(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<UpdateCompanyRequest>,
) -> Result<HttpResponse, AppError> {
    let company_id = path.into_inner();
    log::info!("✏️  PATCH /company/{}", company_id);
    request.validate()?;
    Ok(HttpResponse::Ok().json(company_service::update_company(&db, &company_id, &request).await?))
}

pub async fn delete_company(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let company_id = path.into_inner();
    log::info!("🗑️  DELETE /company/{}", company_id);
    company_service::delete_company(&db, &company_id).await?;
    Ok(deleted(format!("Company with ID {} deleted", company_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, http::StatusCode, test, App};
    use serde_json::json;

    #[actix_rt::test]
    async fn test_bulk_keeps_going_past_invalid_companies() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(MongoDB::detached().await))
                .route("/company/bulk", web::post().to(bulk_create_companies)),
        )
        .await;

        let batch = json!([
            { "user": { "email": "not-an-email", "first_name": "A", "last_name": "B" } },
            {
                "user": { "email": "hr@acme.io", "first_name": "Hr", "last_name": "Team" },
                "company": {
                    "companyName": "Acme",
                    "description": "Widgets",
                    "sponsership": "PLATINUM",
                    "contactPersonName": "Nimal",
                    "contactPersonDesignation": "HR",
                    "contactNumber": "0771234567",
                    "location": "Colombo"
                }
            }
        ]);

        let req = test::TestRequest::post().uri("/company/bulk").set_json(&batch).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let body: serde_json::Value = serde_json::from_slice(&to_bytes(res.into_body()).await.unwrap()).unwrap();
        assert_eq!(body["summary"]["total"], 2);
        assert_eq!(body["summary"]["failed"], 2);
        assert!(body["failed"][1]["error"].as_str().unwrap().contains("PLATINUM"));
    }
}
