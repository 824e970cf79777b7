use mongodb::bson::Document;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::company::Company;
use crate::models::room::Room;
use crate::models::student::StudentGroup;
use crate::utils::error::AppError;
use crate::utils::validation::{optional_non_empty, require_non_empty, Validate};

/// Stream a stall favours when pulling walk-ins. `All` means no preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum StallPreference {
    Bt,
    Zl,
    Ch,
    Mt,
    Bms,
    St,
    Gl,
    Cs,
    Ds,
    Ml,
    Cm,
    Es,
    Mb,
    Ph,
    #[default]
    All,
}

impl StallPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            StallPreference::Bt => "BT",
            StallPreference::Zl => "ZL",
            StallPreference::Ch => "CH",
            StallPreference::Mt => "MT",
            StallPreference::Bms => "BMS",
            StallPreference::St => "ST",
            StallPreference::Gl => "GL",
            StallPreference::Cs => "CS",
            StallPreference::Ds => "DS",
            StallPreference::Ml => "ML",
            StallPreference::Cm => "CM",
            StallPreference::Es => "ES",
            StallPreference::Mb => "MB",
            StallPreference::Ph => "PH",
            StallPreference::All => "ALL",
        }
    }

    /// A group matches when its code contains the preference code.
    pub fn favours(&self, group: StudentGroup) -> bool {
        match self {
            StallPreference::All => false,
            preference => group.as_str().contains(preference.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StallStatus {
    #[default]
    Active,
    Finished,
    Paused,
    WalkIn,
}

impl StallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StallStatus::Active => "active",
            StallStatus::Finished => "finished",
            StallStatus::Paused => "paused",
            StallStatus::WalkIn => "walk-in",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Stall {
    #[serde(rename = "stallID")]
    pub stall_id: String,
    pub title: String,
    #[serde(rename = "roomID")]
    pub room_id: String,
    #[serde(rename = "companyID")]
    pub company_id: String,
    #[serde(default)]
    pub preference: StallPreference,
    #[serde(default)]
    pub status: StallStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StallDetails {
    #[serde(flatten)]
    pub stall: Stall,
    pub room: Option<Room>,
    pub company: Option<Company>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateStallRequest {
    pub title: String,
    #[serde(rename = "roomID")]
    pub room_id: String,
    #[serde(rename = "companyID")]
    pub company_id: String,
    pub preference: Option<StallPreference>,
    pub status: Option<StallStatus>,
}

impl Validate for CreateStallRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("title", &self.title)?;
        require_non_empty("roomID", &self.room_id)?;
        require_non_empty("companyID", &self.company_id)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateStallRequest {
    pub title: Option<String>,
    #[serde(rename = "roomID")]
    pub room_id: Option<String>,
    #[serde(rename = "companyID")]
    pub company_id: Option<String>,
    pub preference: Option<StallPreference>,
    pub status: Option<StallStatus>,
}

impl Validate for UpdateStallRequest {
    fn validate(&self) -> Result<(), AppError> {
        optional_non_empty("title", self.title.as_deref())?;
        optional_non_empty("roomID", self.room_id.as_deref())?;
        optional_non_empty("companyID", self.company_id.as_deref())
    }
}

impl UpdateStallRequest {
    pub fn to_set_doc(&self) -> Document {
        let mut set = Document::new();
        if let Some(title) = &self.title {
            set.insert("title", title);
        }
        if let Some(room_id) = &self.room_id {
            set.insert("roomID", room_id);
        }
        if let Some(company_id) = &self.company_id {
            set.insert("companyID", company_id);
        }
        if let Some(preference) = self.preference {
            set.insert("preference", preference.as_str());
        }
        if let Some(status) = self.status {
            set.insert("status", status.as_str());
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_value(StallStatus::WalkIn).unwrap(), "walk-in");
        assert_eq!(serde_json::to_value(StallStatus::Paused).unwrap(), "paused");
        assert_eq!(serde_json::to_value(StallPreference::All).unwrap(), "ALL");
    }

    #[test]
    fn test_preference_matches_group_codes() {
        assert!(StallPreference::Cs.favours(StudentGroup::Cs));
        assert!(!StallPreference::Cs.favours(StudentGroup::Ds));
        assert!(StallPreference::Mt.favours(StudentGroup::Mt));
        assert!(!StallPreference::All.favours(StudentGroup::Cs));
    }

    #[test]
    fn test_stall_defaults() {
        let stall: Stall = serde_json::from_value(serde_json::json!({
            "stallID": "st1",
            "title": "Stall 1",
            "roomID": "r1",
            "companyID": "c1"
        }))
        .unwrap();
        assert_eq!(stall.preference, StallPreference::All);
        assert_eq!(stall.status, StallStatus::Active);
    }
}
