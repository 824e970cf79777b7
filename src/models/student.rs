use mongodb::bson::Document;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::user::{CreateUserRequest, UpdateUserRequest, UserInfo};
use crate::utils::error::AppError;
use crate::utils::validation::{optional_non_empty, require_non_empty, require_url, Validate};

/// Degree stream codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum StudentGroup {
    Zl,
    Bt,
    Ch,
    Mt,
    Bms,
    St,
    Gl,
    Cs,
    Ds,
    Ml,
    Bl,
    Mb,
    Cm,
    As,
    Es,
    Sor,
}

impl StudentGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentGroup::Zl => "ZL",
            StudentGroup::Bt => "BT",
            StudentGroup::Ch => "CH",
            StudentGroup::Mt => "MT",
            StudentGroup::Bms => "BMS",
            StudentGroup::St => "ST",
            StudentGroup::Gl => "GL",
            StudentGroup::Cs => "CS",
            StudentGroup::Ds => "DS",
            StudentGroup::Ml => "ML",
            StudentGroup::Bl => "BL",
            StudentGroup::Mb => "MB",
            StudentGroup::Cm => "CM",
            StudentGroup::As => "AS",
            StudentGroup::Es => "ES",
            StudentGroup::Sor => "SOR",
        }
    }
}

/// Year of study. Declaration order is seniority, so `Ord` ranks level_4 highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub enum StudentLevel {
    #[serde(rename = "level_1")]
    Level1,
    #[serde(rename = "level_2")]
    Level2,
    #[serde(rename = "level_3")]
    Level3,
    #[serde(rename = "level_4")]
    Level4,
}

impl StudentLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentLevel::Level1 => "level_1",
            StudentLevel::Level2 => "level_2",
            StudentLevel::Level3 => "level_3",
            StudentLevel::Level4 => "level_4",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(rename = "studentID")]
    pub student_id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub reg_no: String,
    pub nic: String,
    pub linkedin: Option<String>,
    pub contact: Option<String>,
    pub group: StudentGroup,
    pub level: StudentLevel,
    #[serde(rename = "created_at")]
    pub created_at: i64,
}

/// Student profile with its account embedded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentDetails {
    #[serde(flatten)]
    pub student: Student,
    pub user: Option<UserInfo>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfileRequest {
    pub reg_no: String,
    pub nic: String,
    pub linkedin: Option<String>,
    pub contact: Option<String>,
    pub group: StudentGroup,
    pub level: StudentLevel,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateStudentRequest {
    pub user: CreateUserRequest,
    pub student: StudentProfileRequest,
}

impl Validate for CreateStudentRequest {
    fn validate(&self) -> Result<(), AppError> {
        self.user.validate()?;
        require_non_empty("regNo", &self.student.reg_no)?;
        require_non_empty("nic", &self.student.nic)?;
        if let Some(linkedin) = &self.student.linkedin {
            require_url("linkedin", linkedin)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    pub reg_no: Option<String>,
    pub nic: Option<String>,
    pub linkedin: Option<String>,
    pub contact: Option<String>,
    pub group: Option<StudentGroup>,
    pub level: Option<StudentLevel>,
    pub user: Option<UpdateUserRequest>,
}

impl Validate for UpdateStudentRequest {
    fn validate(&self) -> Result<(), AppError> {
        optional_non_empty("regNo", self.reg_no.as_deref())?;
        optional_non_empty("nic", self.nic.as_deref())?;
        if let Some(linkedin) = &self.linkedin {
            require_url("linkedin", linkedin)?;
        }
        if let Some(user) = &self.user {
            user.validate()?;
        }
        Ok(())
    }
}

impl UpdateStudentRequest {
    pub fn to_set_doc(&self) -> Document {
        let mut set = Document::new();
        if let Some(reg_no) = &self.reg_no {
            set.insert("regNo", reg_no);
        }
        if let Some(nic) = &self.nic {
            set.insert("nic", nic);
        }
        if let Some(linkedin) = &self.linkedin {
            set.insert("linkedin", linkedin);
        }
        if let Some(contact) = &self.contact {
            set.insert("contact", contact);
        }
        if let Some(group) = self.group {
            set.insert("group", group.as_str());
        }
        if let Some(level) = self.level {
            set.insert("level", level.as_str());
        }
        set
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct StudentFilterQuery {
    pub group: Option<StudentGroup>,
    pub level: Option<StudentLevel>,
}
