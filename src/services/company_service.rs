use mongodb::bson::{doc, Document};
use std::collections::HashMap;

use crate::database::{collections, MongoDB};
use crate::models::{
    parse_items, BulkResult, Company, CompanyDetails, CompanyFilterQuery, CompanyName, CreateCompanyRequest,
    UpdateCompanyRequest, UserRole,
};
use crate::services::user_service;
use crate::utils::{error::AppError, new_id, now_millis};

async fn with_users(db: &MongoDB, companies: Vec<Company>) -> Result<Vec<CompanyDetails>, AppError> {
    let user_ids: Vec<String> = companies.iter().map(|c| c.user_id.clone()).collect();
    let mut users = user_service::users_by_ids(db, &user_ids).await?;

    Ok(companies
        .into_iter()
        .map(|company| CompanyDetails {
            user: users.remove(&company.user_id),
            company,
        })
        .collect())
}

/// Creates the company account (role forced to company) and its profile.
pub async fn create_company(db: &MongoDB, request: &CreateCompanyRequest) -> Result<CompanyDetails, AppError> {
    let user = user_service::create_user(db, &request.user, UserRole::Company).await?;
    let profile = &request.company;

    let company = Company {
        company_id: new_id(),
        user_id: user.user_id.clone(),
        company_name: profile.company_name.trim().to_string(),
        description: profile.description.clone(),
        sponsership: profile.sponsership,
        contact_person_name: profile.contact_person_name.clone(),
        contact_person_designation: profile.contact_person_designation.clone(),
        contact_number: profile.contact_number.clone(),
        logo: profile.logo.clone(),
        location: profile.location.clone(),
        company_website: profile.company_website.clone(),
        created_at: now_millis(),
    };

    if let Err(e) = db
        .collection::<Company>(collections::COMPANIES)
        .insert_one(&company)
        .await
    {
        user_service::delete_user(db, &user.user_id).await?;
        return Err(e.into());
    }

    log::info!("✅ Company created: {} ({})", company.company_name, company.company_id);
    Ok(CompanyDetails {
        company,
        user: Some(user.into()),
    })
}

/// Each entry is decoded, validated and created on its own; failures are reported by index.
pub async fn bulk_create(db: &MongoDB, items: Vec<serde_json::Value>) -> BulkResult<CompanyDetails> {
    let requests = parse_items::<CreateCompanyRequest>(items);
    let mut result = BulkResult::with_capacity(requests.len());

    for (index, request) in requests.into_iter().enumerate() {
        let outcome = match request {
            Ok(request) => create_company(db, &request).await,
            Err(e) => Err(e),
        };
        result.record(index, outcome);
    }

    log::info!(
        "📦 Bulk company import: {} ok, {} failed",
        result.summary.successful,
        result.summary.failed
    );
    result
}

pub async fn list_companies(db: &MongoDB) -> Result<Vec<CompanyDetails>, AppError> {
    let companies = db
        .find_many(collections::COMPANIES, doc! {}, Some(doc! { "companyName": 1 }))
        .await?;
    with_users(db, companies).await
}

pub async fn list_names(db: &MongoDB) -> Result<Vec<CompanyName>, AppError> {
    let companies: Vec<Company> = db
        .find_many(collections::COMPANIES, doc! {}, Some(doc! { "companyName": 1 }))
        .await?;
    Ok(companies
        .into_iter()
        .map(|c| CompanyName {
            company_id: c.company_id,
            company_name: c.company_name,
        })
        .collect())
}

pub fn filter_doc(query: &CompanyFilterQuery) -> Document {
    let mut filter = Document::new();
    if let Some(location) = query.location.as_deref().filter(|l| !l.trim().is_empty()) {
        filter.insert("location", location.trim());
    }
    if let Some(sponsership) = query.sponsership {
        filter.insert("sponsership", sponsership.as_str());
    }
    filter
}

pub async fn filter_companies(db: &MongoDB, query: &CompanyFilterQuery) -> Result<Vec<CompanyDetails>, AppError> {
    let companies = db
        .find_many(collections::COMPANIES, filter_doc(query), Some(doc! { "companyName": 1 }))
        .await?;
    with_users(db, companies).await
}

pub async fn find_company(db: &MongoDB, company_id: &str) -> Result<Option<Company>, AppError> {
    db.find_one(collections::COMPANIES, doc! { "companyID": company_id }).await
}

pub async fn require_company(db: &MongoDB, company_id: &str) -> Result<Company, AppError> {
    find_company(db, company_id)
        .await?
        .ok_or_else(|| AppError::not_found("Company", company_id))
}

pub async fn get_company(db: &MongoDB, company_id: &str) -> Result<CompanyDetails, AppError> {
    let company = require_company(db, company_id).await?;
    let user = user_service::find_user(db, &company.user_id).await?.map(Into::into);
    Ok(CompanyDetails { company, user })
}

pub async fn find_by_user(db: &MongoDB, user_id: &str) -> Result<Option<Company>, AppError> {
    db.find_one(collections::COMPANIES, doc! { "userID": user_id }).await
}

pub async fn get_by_user(db: &MongoDB, user_id: &str) -> Result<CompanyDetails, AppError> {
    let company = find_by_user(db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Company for user {} not found", user_id)))?;
    let user = user_service::find_user(db, user_id).await?.map(Into::into);
    Ok(CompanyDetails { company, user })
}

pub async fn update_company(
    db: &MongoDB,
    company_id: &str,
    request: &UpdateCompanyRequest,
) -> Result<CompanyDetails, AppError> {
    let company = require_company(db, company_id).await?;

    let set = request.to_set_doc();
    if !set.is_empty() {
        db.collection::<Company>(collections::COMPANIES)
            .update_one(doc! { "companyID": company_id }, doc! { "$set": set })
            .await?;
    }
    if let Some(user) = &request.user {
        user_service::update_user(db, &company.user_id, user).await?;
    }

    get_company(db, company_id).await
}

/// Removes the company together with its account.
pub async fn delete_company(db: &MongoDB, company_id: &str) -> Result<(), AppError> {
    let company = require_company(db, company_id).await?;

    db.collection::<Company>(collections::COMPANIES)
        .delete_one(doc! { "companyID": company_id })
        .await?;
    user_service::delete_user(db, &company.user_id).await?;

    log::info!("🗑️  Company deleted: {}", company_id);
    Ok(())
}

pub async fn companies_by_ids(db: &MongoDB, ids: &[String]) -> Result<HashMap<String, Company>, AppError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let companies: Vec<Company> = db
        .find_many(collections::COMPANIES, doc! { "companyID": { "$in": ids.to_vec() } }, None)
        .await?;
    Ok(companies
        .into_iter()
        .map(|company| (company.company_id.clone(), company))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sponsorship;

    #[test]
    fn test_filter_doc_skips_blank_location() {
        let query = CompanyFilterQuery {
            location: Some("  ".into()),
            sponsership: Some(Sponsorship::Main),
        };
        assert_eq!(filter_doc(&query), doc! { "sponsership": "MAIN" });

        let query = CompanyFilterQuery {
            location: Some("Colombo".into()),
            sponsership: None,
        };
        assert_eq!(filter_doc(&query), doc! { "location": "Colombo" });
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_company_with_taken_email_is_conflict() {
        dotenv::dotenv().ok();
        let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| "mongodb://localhost:27017".into());
        let db = MongoDB::new(&url, "industry_day_test").await.unwrap();

        let email = format!("careers-{}@acme.io", new_id());
        let request: CreateCompanyRequest = serde_json::from_value(serde_json::json!({
            "user": { "email": email, "first_name": "Hr", "last_name": "Team" },
            "company": {
                "companyName": "Acme",
                "description": "Widgets",
                "sponsership": "SILVER",
                "contactPersonName": "Nimal",
                "contactPersonDesignation": "HR",
                "contactNumber": "0771234567",
                "location": "Colombo"
            }
        }))
        .unwrap();

        let company = create_company(&db, &request).await.unwrap();
        let second = create_company(&db, &request).await;
        assert!(matches!(second, Err(AppError::Conflict(ref msg)) if msg == user_service::EMAIL_EXISTS));

        delete_company(&db, &company.company.company_id).await.unwrap();
    }
}
