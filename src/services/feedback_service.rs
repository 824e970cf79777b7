use mongodb::bson::{doc, Document};

use crate::database::{collections, MongoDB};
use crate::models::{CreateFeedbackRequest, Feedback, FeedbackView, UpdateFeedbackRequest, UserRole};
use crate::services::user_service;
use crate::utils::{error::AppError, new_id, now_millis};

async fn with_users(db: &MongoDB, feedback: Vec<Feedback>) -> Result<Vec<FeedbackView>, AppError> {
    let user_ids: Vec<String> = feedback.iter().map(|f| f.user_id.clone()).collect();
    let users = user_service::users_by_ids(db, &user_ids).await?;

    Ok(feedback
        .into_iter()
        .map(|feedback| FeedbackView {
            user: users.get(&feedback.user_id).cloned(),
            feedback,
        })
        .collect())
}

async fn list_where(db: &MongoDB, filter: Document) -> Result<Vec<FeedbackView>, AppError> {
    let feedback = db
        .find_many(collections::FEEDBACKS, filter, Some(doc! { "created_at": -1 }))
        .await?;
    with_users(db, feedback).await
}

pub async fn create_feedback(
    db: &MongoDB,
    user_id: &str,
    request: &CreateFeedbackRequest,
) -> Result<FeedbackView, AppError> {
    let feedback = Feedback {
        feedback_id: new_id(),
        comment: request.comment.trim().to_string(),
        rating: request.rating,
        user_id: user_id.to_string(),
        created_at: now_millis(),
    };

    db.collection::<Feedback>(collections::FEEDBACKS)
        .insert_one(&feedback)
        .await?;
    log::info!("⭐ Feedback {} ({}★) from {}", feedback.feedback_id, feedback.rating, user_id);

    get_feedback(db, &feedback.feedback_id).await
}

pub async fn list_feedback(db: &MongoDB) -> Result<Vec<FeedbackView>, AppError> {
    list_where(db, doc! {}).await
}

/// Feedback written by users holding `role`.
pub async fn list_by_role(db: &MongoDB, role: UserRole) -> Result<Vec<FeedbackView>, AppError> {
    let user_ids = user_service::list_user_ids_by_role(db, role).await?;
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }
    list_where(db, doc! { "userID": { "$in": user_ids } }).await
}

pub async fn get_feedback(db: &MongoDB, feedback_id: &str) -> Result<FeedbackView, AppError> {
    let feedback: Feedback = db
        .find_one(collections::FEEDBACKS, doc! { "feedbackID": feedback_id })
        .await?
        .ok_or_else(|| AppError::not_found("Feedback", feedback_id))?;

    with_users(db, vec![feedback])
        .await?
        .pop()
        .ok_or_else(|| AppError::not_found("Feedback", feedback_id))
}

pub async fn update_feedback(
    db: &MongoDB,
    feedback_id: &str,
    request: &UpdateFeedbackRequest,
) -> Result<FeedbackView, AppError> {
    let set = request.to_set_doc();
    if !set.is_empty() {
        let result = db
            .collection::<Feedback>(collections::FEEDBACKS)
            .update_one(doc! { "feedbackID": feedback_id }, doc! { "$set": set })
            .await?;
        if result.matched_count == 0 {
            return Err(AppError::not_found("Feedback", feedback_id));
        }
    }

    get_feedback(db, feedback_id).await
}

pub async fn delete_feedback(db: &MongoDB, feedback_id: &str) -> Result<(), AppError> {
    let result = db
        .collection::<Feedback>(collections::FEEDBACKS)
        .delete_one(doc! { "feedbackID": feedback_id })
        .await?;
    if result.deleted_count == 0 {
        return Err(AppError::not_found("Feedback", feedback_id));
    }
    Ok(())
}
