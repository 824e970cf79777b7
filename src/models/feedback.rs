use mongodb::bson::Document;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::user::UserInfo;
use crate::utils::error::AppError;
use crate::utils::validation::{optional_non_empty, require_non_empty, require_range, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Feedback {
    #[serde(rename = "feedbackID")]
    pub feedback_id: String,
    pub comment: String,
    pub rating: i32,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedbackView {
    #[serde(flatten)]
    pub feedback: Feedback,
    pub user: Option<UserInfo>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateFeedbackRequest {
    pub comment: String,
    pub rating: i32,
}

impl Validate for CreateFeedbackRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("comment", &self.comment)?;
        require_range("rating", self.rating.into(), 1, 5)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateFeedbackRequest {
    pub comment: Option<String>,
    pub rating: Option<i32>,
}

impl Validate for UpdateFeedbackRequest {
    fn validate(&self) -> Result<(), AppError> {
        optional_non_empty("comment", self.comment.as_deref())?;
        if let Some(rating) = self.rating {
            require_range("rating", rating.into(), 1, 5)?;
        }
        Ok(())
    }
}

impl UpdateFeedbackRequest {
    pub fn to_set_doc(&self) -> Document {
        let mut set = Document::new();
        if let Some(comment) = &self.comment {
            set.insert("comment", comment);
        }
        if let Some(rating) = self.rating {
            set.insert("rating", rating);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        let ok = CreateFeedbackRequest { comment: "Great event".into(), rating: 5 };
        assert!(ok.validate().is_ok());

        let too_high = CreateFeedbackRequest { comment: "Great event".into(), rating: 6 };
        assert!(too_high.validate().is_err());

        let update = UpdateFeedbackRequest { rating: Some(0), ..Default::default() };
        assert!(update.validate().is_err());
    }
}
