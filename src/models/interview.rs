use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::company::Company;
use crate::models::stall::Stall;
use crate::models::student::StudentDetails;
use crate::utils::error::AppError;
use crate::utils::validation::{require_non_empty, Validate};

pub const DEFAULT_PREFERENCE: i32 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum InterviewType {
    PreListed,
    WalkIn,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::PreListed => "pre-listed",
            InterviewType::WalkIn => "walk-in",
        }
    }

    /// Status a freshly created interview of this type starts in.
    pub fn initial_status(&self) -> InterviewStatus {
        match self {
            InterviewType::PreListed => InterviewStatus::InQueue,
            InterviewType::WalkIn => InterviewStatus::Scheduled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Scheduled,
    InQueue,
    Completed,
    Cancelled,
}

impl InterviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "scheduled",
            InterviewStatus::InQueue => "in_queue",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Interview {
    #[serde(rename = "interviewID")]
    pub interview_id: String,
    #[serde(rename = "stallID", default)]
    pub stall_id: Option<String>,
    #[serde(rename = "companyID")]
    pub company_id: String,
    #[serde(rename = "studentID")]
    pub student_id: String,
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub status: InterviewStatus,
    pub remark: Option<String>,
    #[serde(default = "default_preference")]
    pub student_preference: i32,
    #[serde(default = "default_preference")]
    pub company_preference: i32,
    pub created_at: i64,
}

fn default_preference() -> i32 {
    DEFAULT_PREFERENCE
}

/// Interview with the student (and account), stall and company it references.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InterviewDetails {
    #[serde(flatten)]
    pub interview: Interview,
    pub student: Option<StudentDetails>,
    pub stall: Option<Stall>,
    pub company: Option<Company>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateInterviewRequest {
    #[serde(rename = "stallID")]
    pub stall_id: Option<String>,
    #[serde(rename = "companyID")]
    pub company_id: String,
    #[serde(rename = "studentID")]
    pub student_id: String,
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub status: Option<InterviewStatus>,
    pub remark: Option<String>,
    pub student_preference: Option<i32>,
    pub company_preference: Option<i32>,
}

impl Validate for CreateInterviewRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("companyID", &self.company_id)?;
        require_non_empty("studentID", &self.student_id)?;
        if let Some(preference) = self.student_preference {
            validate_preference("student_preference", preference)?;
        }
        if let Some(preference) = self.company_preference {
            validate_preference("company_preference", preference)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterviewByRegNoRequest {
    pub reg_no: String,
    #[serde(rename = "companyID")]
    pub company_id: String,
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub remark: Option<String>,
}

impl Validate for CreateInterviewByRegNoRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("regNo", &self.reg_no)?;
        require_non_empty("companyID", &self.company_id)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateInterviewRequest {
    /// `null` detaches the interview from its stall.
    #[serde(rename = "stallID", default, deserialize_with = "double_option")]
    pub stall_id: Option<Option<String>>,
    #[serde(rename = "companyID")]
    pub company_id: Option<String>,
    #[serde(rename = "studentID")]
    pub student_id: Option<String>,
    #[serde(rename = "type")]
    pub interview_type: Option<InterviewType>,
    pub status: Option<InterviewStatus>,
    pub remark: Option<String>,
    pub student_preference: Option<i32>,
    pub company_preference: Option<i32>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl Validate for UpdateInterviewRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(preference) = self.student_preference {
            validate_preference("student_preference", preference)?;
        }
        if let Some(preference) = self.company_preference {
            validate_preference("company_preference", preference)?;
        }
        Ok(())
    }
}

impl UpdateInterviewRequest {
    pub fn to_set_doc(&self) -> Document {
        let mut set = Document::new();
        if let Some(stall_id) = &self.stall_id {
            let value = match stall_id {
                Some(id) => Bson::String(id.clone()),
                None => Bson::Null,
            };
            set.insert("stallID", value);
        }
        if let Some(company_id) = &self.company_id {
            set.insert("companyID", company_id);
        }
        if let Some(student_id) = &self.student_id {
            set.insert("studentID", student_id);
        }
        if let Some(interview_type) = self.interview_type {
            set.insert("type", interview_type.as_str());
        }
        if let Some(status) = self.status {
            set.insert("status", status.as_str());
        }
        if let Some(remark) = &self.remark {
            set.insert("remark", remark);
        }
        if let Some(preference) = self.student_preference {
            set.insert("student_preference", preference);
        }
        if let Some(preference) = self.company_preference {
            set.insert("company_preference", preference);
        }
        set
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StudentPreferenceRequest {
    pub student_preference: i32,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NextWalkinQuery {
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpdatedResponse {
    pub updated: u64,
}

pub fn validate_preference(field: &str, value: i32) -> Result<(), AppError> {
    if value < 1 {
        return Err(AppError::Validation(format!("{} must be at least 1", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_type_and_status_wire_names() {
        assert_eq!(serde_json::to_value(InterviewType::PreListed).unwrap(), "pre-listed");
        assert_eq!(serde_json::to_value(InterviewType::WalkIn).unwrap(), "walk-in");
        assert_eq!(serde_json::to_value(InterviewStatus::InQueue).unwrap(), "in_queue");
        assert_eq!(InterviewStatus::InQueue.as_str(), "in_queue");
    }

    #[test]
    fn test_initial_status_by_type() {
        assert_eq!(InterviewType::PreListed.initial_status(), InterviewStatus::InQueue);
        assert_eq!(InterviewType::WalkIn.initial_status(), InterviewStatus::Scheduled);
    }

    #[test]
    fn test_missing_preferences_default_to_999() {
        let interview: Interview = serde_json::from_value(serde_json::json!({
            "interviewID": "i1",
            "companyID": "c1",
            "studentID": "s1",
            "type": "walk-in",
            "status": "scheduled",
            "created_at": 1
        }))
        .unwrap();
        assert_eq!(interview.student_preference, 999);
        assert_eq!(interview.company_preference, 999);
        assert!(interview.stall_id.is_none());
    }

    #[test]
    fn test_update_distinguishes_null_stall_from_absent() {
        let detach: UpdateInterviewRequest =
            serde_json::from_value(serde_json::json!({ "stallID": null })).unwrap();
        assert_eq!(detach.to_set_doc(), doc! { "stallID": Bson::Null });

        let untouched: UpdateInterviewRequest =
            serde_json::from_value(serde_json::json!({ "remark": "good" })).unwrap();
        assert_eq!(untouched.to_set_doc(), doc! { "remark": "good" });
    }

    #[test]
    fn test_preference_must_be_positive() {
        assert!(validate_preference("student_preference", 1).is_ok());
        assert!(validate_preference("student_preference", 0).is_err());
        assert!(validate_preference("student_preference", -3).is_err());
    }
}
