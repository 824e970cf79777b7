use mongodb::bson::Document;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::company::Company;
use crate::models::student::StudentDetails;
use crate::utils::error::AppError;
use crate::utils::validation::{optional_non_empty, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Shortlist {
    #[serde(rename = "shortlistID")]
    pub shortlist_id: String,
    #[serde(rename = "companyID")]
    pub company_id: String,
    #[serde(rename = "studentID")]
    pub student_id: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShortlistDetails {
    #[serde(flatten)]
    pub shortlist: Shortlist,
    pub company: Option<Company>,
    pub student: Option<StudentDetails>,
}

/// All fields are optional on the wire so missing ones surface as a 400 with one message.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateShortlistRequest {
    #[serde(rename = "companyID")]
    pub company_id: Option<String>,
    #[serde(rename = "studentID")]
    pub student_id: Option<String>,
    pub description: Option<String>,
}

impl CreateShortlistRequest {
    /// Returns `(companyID, studentID, description)` once every field is present.
    pub fn require_fields(&self) -> Result<(String, String, String), AppError> {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        match (
            non_blank(&self.company_id),
            non_blank(&self.student_id),
            non_blank(&self.description),
        ) {
            (Some(company_id), Some(student_id), Some(description)) => {
                Ok((company_id, student_id, description))
            }
            _ => Err(AppError::Validation(
                "companyID, studentID and description are required".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateShortlistRequest {
    #[serde(rename = "companyID")]
    pub company_id: Option<String>,
    #[serde(rename = "studentID")]
    pub student_id: Option<String>,
    pub description: Option<String>,
}

impl Validate for UpdateShortlistRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.to_set_doc().is_empty() {
            return Err(AppError::Validation("No fields to update".to_string()));
        }
        optional_non_empty("companyID", self.company_id.as_deref())?;
        optional_non_empty("studentID", self.student_id.as_deref())?;
        optional_non_empty("description", self.description.as_deref())
    }
}

impl UpdateShortlistRequest {
    pub fn to_set_doc(&self) -> Document {
        let mut set = Document::new();
        if let Some(company_id) = &self.company_id {
            set.insert("companyID", company_id);
        }
        if let Some(student_id) = &self.student_id {
            set.insert("studentID", student_id);
        }
        if let Some(description) = &self.description {
            set.insert("description", description);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_every_field() {
        let complete = CreateShortlistRequest {
            company_id: Some("c1".into()),
            student_id: Some("s1".into()),
            description: Some("Strong backend skills".into()),
        };
        assert_eq!(
            complete.require_fields().unwrap(),
            ("c1".to_string(), "s1".to_string(), "Strong backend skills".to_string())
        );

        let missing = CreateShortlistRequest {
            description: Some("   ".into()),
            ..complete.clone()
        };
        assert!(matches!(missing.require_fields(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_empty_update_is_rejected() {
        let err = UpdateShortlistRequest::default().validate().unwrap_err();
        assert_eq!(err.to_string(), "No fields to update");
    }
}
