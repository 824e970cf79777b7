use mongodb::bson::Document;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::user::UserInfo;
use crate::utils::error::AppError;
use crate::utils::validation::{optional_non_empty, require_non_empty, Validate};

pub const DEFAULT_AUTHOR: &str = "SIIC";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum AudienceType {
    #[default]
    All,
    Students,
    Companies,
}

impl AudienceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudienceType::All => "ALL",
            AudienceType::Students => "STUDENTS",
            AudienceType::Companies => "COMPANIES",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(rename = "announcementID")]
    pub announcement_id: String,
    pub title: String,
    pub content: String,
    pub audience_type: AudienceType,
    #[serde(rename = "postedByUserID")]
    pub posted_by_user_id: String,
    #[serde(rename = "created_at")]
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementView {
    #[serde(flatten)]
    pub announcement: Announcement,
    pub posted_by_user: Option<UserInfo>,
    #[serde(rename = "author_name")]
    pub author_name: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub content: String,
    pub audience_type: Option<AudienceType>,
}

impl Validate for CreateAnnouncementRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("title", &self.title)?;
        require_non_empty("content", &self.content)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnnouncementRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub audience_type: Option<AudienceType>,
}

impl Validate for UpdateAnnouncementRequest {
    fn validate(&self) -> Result<(), AppError> {
        optional_non_empty("title", self.title.as_deref())?;
        optional_non_empty("content", self.content.as_deref())
    }
}

impl UpdateAnnouncementRequest {
    pub fn to_set_doc(&self) -> Document {
        let mut set = Document::new();
        if let Some(title) = &self.title {
            set.insert("title", title);
        }
        if let Some(content) = &self.content {
            set.insert("content", content);
        }
        if let Some(audience) = self.audience_type {
            set.insert("audienceType", audience.as_str());
        }
        set
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AudienceQuery {
    pub audience: Option<AudienceType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audience_defaults_to_all() {
        let request: CreateAnnouncementRequest = serde_json::from_value(serde_json::json!({
            "title": "Welcome",
            "content": "Doors open at 9"
        }))
        .unwrap();
        assert_eq!(request.audience_type.unwrap_or_default(), AudienceType::All);
    }

    #[test]
    fn test_view_flattens_announcement() {
        let view = AnnouncementView {
            announcement: Announcement {
                announcement_id: "a1".into(),
                title: "T".into(),
                content: "C".into(),
                audience_type: AudienceType::Students,
                posted_by_user_id: "u1".into(),
                created_at: 5,
            },
            posted_by_user: None,
            author_name: DEFAULT_AUTHOR.into(),
        };
        let json = serde_json::to_value(view).unwrap();
        assert_eq!(json["announcementID"], "a1");
        assert_eq!(json["audienceType"], "STUDENTS");
        assert_eq!(json["author_name"], "SIIC");
    }
}
