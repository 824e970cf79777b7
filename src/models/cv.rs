use mongodb::bson::Document;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::student::StudentDetails;
use crate::utils::error::AppError;
use crate::utils::validation::{optional_non_empty, require_non_empty, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentCv {
    #[serde(rename = "cvID")]
    pub cv_id: String,
    #[serde(rename = "studentID")]
    pub student_id: String,
    pub file_name: String,
    pub file_path: Option<String>,
    #[serde(rename = "created_at")]
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentCvDetails {
    #[serde(flatten)]
    pub cv: StudentCv,
    pub student: Option<StudentDetails>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCvRequest {
    #[serde(rename = "studentID")]
    pub student_id: String,
    pub file_name: String,
    pub file_path: Option<String>,
}

impl Validate for CreateCvRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("studentID", &self.student_id)?;
        require_non_empty("fileName", &self.file_name)
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCvByRegNoRequest {
    pub reg_no: String,
    pub file_name: String,
    pub file_path: Option<String>,
}

impl Validate for CreateCvByRegNoRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("regNo", &self.reg_no)?;
        require_non_empty("fileName", &self.file_name)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCvRequest {
    #[serde(rename = "studentID")]
    pub student_id: Option<String>,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
}

impl Validate for UpdateCvRequest {
    fn validate(&self) -> Result<(), AppError> {
        optional_non_empty("studentID", self.student_id.as_deref())?;
        optional_non_empty("fileName", self.file_name.as_deref())
    }
}

impl UpdateCvRequest {
    pub fn to_set_doc(&self) -> Document {
        let mut set = Document::new();
        if let Some(student_id) = &self.student_id {
            set.insert("studentID", student_id);
        }
        if let Some(file_name) = &self.file_name {
            set.insert("fileName", file_name);
        }
        if let Some(file_path) = &self.file_path {
            set.insert("filePath", file_path);
        }
        set
    }
}
