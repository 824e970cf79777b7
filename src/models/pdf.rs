use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::error::AppError;
use crate::utils::validation::{require_non_empty, Validate};

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Metadata of a stored PDF. The bytes live next to it in the store.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PdfInfo {
    pub id: String,
    pub original_name: String,
    pub filename: String,
    pub mimetype: String,
    pub size: usize,
    pub uploaded_at: i64,
}

/// File upload carried as JSON. `data` is standard base64.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadPdfRequest {
    pub filename: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    pub data: String,
    pub custom_filename: Option<String>,
}

fn default_content_type() -> String {
    PDF_MIME_TYPE.to_string()
}

impl Validate for UploadPdfRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("filename", &self.filename)?;
        require_non_empty("data", &self.data)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    pub total_files: usize,
    pub total_size: usize,
    pub average_size: usize,
    pub oldest_file: Option<PdfInfo>,
    pub newest_file: Option<PdfInfo>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MemoryUsage {
    pub bytes: usize,
    pub megabytes: f64,
    pub gigabytes: f64,
}

// ==================== JOB POSTS ====================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobPost {
    #[serde(rename = "jobPostID")]
    pub job_post_id: String,
    #[serde(rename = "companyID")]
    pub company_id: String,
    pub file_name: String,
    #[serde(rename = "pdfID")]
    pub pdf_id: String,
    #[serde(rename = "created_at")]
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobPostDetails {
    #[serde(flatten)]
    pub job_post: JobPost,
    pub company: Option<crate::models::company::Company>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UploadJobPostRequest {
    #[serde(rename = "companyID")]
    pub company_id: Option<String>,
    pub file: Option<UploadPdfRequest>,
}
