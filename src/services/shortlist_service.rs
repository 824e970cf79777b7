use mongodb::bson::{doc, Document};

use crate::database::{collections, MongoDB};
use crate::models::{CreateShortlistRequest, Shortlist, ShortlistDetails, UpdateShortlistRequest};
use crate::services::{company_service, student_service};
use crate::utils::{error::AppError, new_id};

pub const ALREADY_SHORTLISTED: &str = "Student is already shortlisted for this company";

async fn with_relations(db: &MongoDB, shortlists: Vec<Shortlist>) -> Result<Vec<ShortlistDetails>, AppError> {
    let company_ids: Vec<String> = shortlists.iter().map(|s| s.company_id.clone()).collect();
    let student_ids: Vec<String> = shortlists.iter().map(|s| s.student_id.clone()).collect();
    let companies = company_service::companies_by_ids(db, &company_ids).await?;
    let students = student_service::students_by_ids(db, &student_ids).await?;

    Ok(shortlists
        .into_iter()
        .map(|shortlist| ShortlistDetails {
            company: companies.get(&shortlist.company_id).cloned(),
            student: students.get(&shortlist.student_id).cloned(),
            shortlist,
        })
        .collect())
}

async fn list_where(db: &MongoDB, filter: Document) -> Result<Vec<ShortlistDetails>, AppError> {
    let shortlists = db.find_many(collections::SHORTLISTS, filter, None).await?;
    with_relations(db, shortlists).await
}

async fn ensure_parties(db: &MongoDB, company_id: &str, student_id: &str) -> Result<(), AppError> {
    company_service::require_company(db, company_id).await?;
    student_service::find_student(db, student_id)
        .await?
        .ok_or_else(|| AppError::not_found("Student", student_id))?;
    Ok(())
}

async fn pair_taken(
    db: &MongoDB,
    company_id: &str,
    student_id: &str,
    except: Option<&str>,
) -> Result<bool, AppError> {
    let mut filter = doc! { "companyID": company_id, "studentID": student_id };
    if let Some(shortlist_id) = except {
        filter.insert("shortlistID", doc! { "$ne": shortlist_id });
    }
    Ok(db.count(collections::SHORTLISTS, filter).await? > 0)
}

pub async fn create_shortlist(db: &MongoDB, request: &CreateShortlistRequest) -> Result<ShortlistDetails, AppError> {
    let (company_id, student_id, description) = request.require_fields()?;
    ensure_parties(db, &company_id, &student_id).await?;

    if pair_taken(db, &company_id, &student_id, None).await? {
        return Err(AppError::Conflict(ALREADY_SHORTLISTED.to_string()));
    }

    let shortlist = Shortlist {
        shortlist_id: new_id(),
        company_id,
        student_id,
        description,
    };

    db.collection::<Shortlist>(collections::SHORTLISTS)
        .insert_one(&shortlist)
        .await
        .map_err(|e| AppError::from_write(e, ALREADY_SHORTLISTED))?;
    log::info!(
        "✅ Student {} shortlisted by company {}",
        shortlist.student_id,
        shortlist.company_id
    );

    get_shortlist(db, &shortlist.shortlist_id).await
}

pub async fn list_shortlists(db: &MongoDB) -> Result<Vec<ShortlistDetails>, AppError> {
    list_where(db, doc! {}).await
}

pub async fn list_by_student(db: &MongoDB, student_id: &str) -> Result<Vec<ShortlistDetails>, AppError> {
    list_where(db, doc! { "studentID": student_id }).await
}

pub async fn list_by_company(db: &MongoDB, company_id: &str) -> Result<Vec<ShortlistDetails>, AppError> {
    list_where(db, doc! { "companyID": company_id }).await
}

async fn require_shortlist(db: &MongoDB, shortlist_id: &str) -> Result<Shortlist, AppError> {
    db.find_one(collections::SHORTLISTS, doc! { "shortlistID": shortlist_id })
        .await?
        .ok_or_else(|| AppError::not_found("Shortlist", shortlist_id))
}

pub async fn get_shortlist(db: &MongoDB, shortlist_id: &str) -> Result<ShortlistDetails, AppError> {
    let shortlist = require_shortlist(db, shortlist_id).await?;
    with_relations(db, vec![shortlist])
        .await?
        .pop()
        .ok_or_else(|| AppError::not_found("Shortlist", shortlist_id))
}

pub async fn update_shortlist(
    db: &MongoDB,
    shortlist_id: &str,
    request: &UpdateShortlistRequest,
) -> Result<ShortlistDetails, AppError> {
    let current = require_shortlist(db, shortlist_id).await?;
    let company_id = request.company_id.as_deref().unwrap_or(&current.company_id);
    let student_id = request.student_id.as_deref().unwrap_or(&current.student_id);

    if request.company_id.is_some() || request.student_id.is_some() {
        ensure_parties(db, company_id, student_id).await?;
        if pair_taken(db, company_id, student_id, Some(shortlist_id)).await? {
            return Err(AppError::Conflict(ALREADY_SHORTLISTED.to_string()));
        }
    }

    db.collection::<Shortlist>(collections::SHORTLISTS)
        .update_one(
            doc! { "shortlistID": shortlist_id },
            doc! { "$set": request.to_set_doc() },
        )
        .await
        .map_err(|e| AppError::from_write(e, ALREADY_SHORTLISTED))?;

    get_shortlist(db, shortlist_id).await
}

pub async fn delete_shortlist(db: &MongoDB, shortlist_id: &str) -> Result<String, AppError> {
    let result = db
        .collection::<Shortlist>(collections::SHORTLISTS)
        .delete_one(doc! { "shortlistID": shortlist_id })
        .await?;
    if result.deleted_count == 0 {
        return Err(AppError::not_found("Shortlist", shortlist_id));
    }

    log::info!("🗑️  Shortlist deleted: {}", shortlist_id);
    Ok(format!("Shortlist with ID {} has been successfully deleted", shortlist_id))
}
