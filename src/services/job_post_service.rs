use mongodb::bson::{doc, Document};

use crate::database::{collections, MongoDB};
use crate::models::{JobPost, JobPostDetails, PdfInfo, UploadJobPostRequest};
use crate::services::company_service;
use crate::services::pdf_storage::PdfStorage;
use crate::utils::validation::Validate;
use crate::utils::{error::AppError, new_id, now_millis};

/// `Acme Corp.` with two posts already becomes `Acme_Corp__3.pdf`.
pub fn job_post_file_name(company_name: &str, sequence: u64, original_name: &str) -> String {
    let stem: String = company_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let extension = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "pdf".to_string());

    format!("{}_{}.{}", stem, sequence, extension)
}

async fn with_companies(db: &MongoDB, posts: Vec<JobPost>) -> Result<Vec<JobPostDetails>, AppError> {
    let company_ids: Vec<String> = posts.iter().map(|p| p.company_id.clone()).collect();
    let companies = company_service::companies_by_ids(db, &company_ids).await?;

    Ok(posts
        .into_iter()
        .map(|job_post| JobPostDetails {
            company: companies.get(&job_post.company_id).cloned(),
            job_post,
        })
        .collect())
}

async fn list_where(db: &MongoDB, filter: Document) -> Result<Vec<JobPostDetails>, AppError> {
    let posts = db
        .find_many(collections::JOB_POSTS, filter, Some(doc! { "created_at": -1 }))
        .await?;
    with_companies(db, posts).await
}

pub async fn upload_job_post(
    db: &MongoDB,
    storage: &PdfStorage,
    request: &UploadJobPostRequest,
) -> Result<JobPostDetails, AppError> {
    let file = request
        .file
        .as_ref()
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    let company_id = request
        .company_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("companyID is required".to_string()))?;
    file.validate()?;

    let company = company_service::require_company(db, company_id).await?;
    let existing = db
        .count(collections::JOB_POSTS, doc! { "companyID": company_id })
        .await?;
    let file_name = job_post_file_name(&company.company_name, existing + 1, &file.filename);

    let mut upload = file.clone();
    upload.custom_filename = Some(file_name.clone());
    let stored: PdfInfo = storage.store_upload(&upload).await?;

    let job_post = JobPost {
        job_post_id: new_id(),
        company_id: company_id.to_string(),
        file_name,
        pdf_id: stored.id.clone(),
        created_at: now_millis(),
    };

    if let Err(e) = db
        .collection::<JobPost>(collections::JOB_POSTS)
        .insert_one(&job_post)
        .await
    {
        storage.delete(&stored.id).await;
        return Err(e.into());
    }

    log::info!(
        "📤 Job post {} uploaded for {} as {}",
        job_post.job_post_id,
        company.company_name,
        job_post.file_name
    );
    Ok(JobPostDetails {
        job_post,
        company: Some(company),
    })
}

pub async fn list_job_posts(db: &MongoDB) -> Result<Vec<JobPostDetails>, AppError> {
    list_where(db, doc! {}).await
}

pub async fn list_by_company(db: &MongoDB, company_id: &str) -> Result<Vec<JobPostDetails>, AppError> {
    list_where(db, doc! { "companyID": company_id }).await
}

async fn require_job_post(db: &MongoDB, job_post_id: &str) -> Result<JobPost, AppError> {
    db.find_one(collections::JOB_POSTS, doc! { "jobPostID": job_post_id })
        .await?
        .ok_or_else(|| AppError::not_found("Job post", job_post_id))
}

pub async fn get_job_post(db: &MongoDB, job_post_id: &str) -> Result<JobPostDetails, AppError> {
    let job_post = require_job_post(db, job_post_id).await?;
    with_companies(db, vec![job_post])
        .await?
        .pop()
        .ok_or_else(|| AppError::not_found("Job post", job_post_id))
}

/// Returns the stored file name and bytes of a job post.
pub async fn download(
    db: &MongoDB,
    storage: &PdfStorage,
    job_post_id: &str,
) -> Result<(String, Vec<u8>), AppError> {
    let job_post = require_job_post(db, job_post_id).await?;
    let (_, bytes) = storage
        .retrieve(&job_post.pdf_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("File for job post {} not found", job_post_id)))?;
    Ok((job_post.file_name, bytes))
}

pub async fn delete_job_post(db: &MongoDB, storage: &PdfStorage, job_post_id: &str) -> Result<(), AppError> {
    let job_post = require_job_post(db, job_post_id).await?;

    db.collection::<JobPost>(collections::JOB_POSTS)
        .delete_one(doc! { "jobPostID": job_post_id })
        .await?;
    if !storage.delete(&job_post.pdf_id).await {
        log::warn!("⚠️  Job post {} had no stored file {}", job_post_id, job_post.pdf_id);
    }

    log::info!("🗑️  Job post deleted: {}", job_post_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_post_file_name() {
        assert_eq!(job_post_file_name("Acme Corp.", 3, "brochure.PDF"), "Acme_Corp__3.pdf");
        assert_eq!(job_post_file_name("WSO2", 1, "openings"), "WSO2_1.pdf");
    }
}
