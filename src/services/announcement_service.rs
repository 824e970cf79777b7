use mongodb::bson::{doc, Document};
use std::collections::HashMap;

use crate::database::{collections, MongoDB};
use crate::models::{
    Announcement, AnnouncementView, AudienceType, Company, CreateAnnouncementRequest,
    UpdateAnnouncementRequest, UserInfo, UserRole, DEFAULT_AUTHOR,
};
use crate::services::user_service;
use crate::utils::{error::AppError, new_id, now_millis};

/// Company posters are credited by company name, everyone else as the organisers.
pub fn author_name(poster: Option<&UserInfo>, companies_by_user: &HashMap<String, String>) -> String {
    poster
        .filter(|user| user.role == UserRole::Company)
        .and_then(|user| companies_by_user.get(&user.user_id).cloned())
        .unwrap_or_else(|| DEFAULT_AUTHOR.to_string())
}

fn audience_filter(audience: AudienceType) -> Document {
    match audience {
        AudienceType::All => doc! {},
        specific => doc! { "audienceType": { "$in": [specific.as_str(), AudienceType::All.as_str()] } },
    }
}

async fn to_views(db: &MongoDB, announcements: Vec<Announcement>) -> Result<Vec<AnnouncementView>, AppError> {
    let poster_ids: Vec<String> = announcements.iter().map(|a| a.posted_by_user_id.clone()).collect();
    let users = user_service::users_by_ids(db, &poster_ids).await?;

    let company_user_ids: Vec<String> = users
        .values()
        .filter(|user| user.role == UserRole::Company)
        .map(|user| user.user_id.clone())
        .collect();
    let companies_by_user: HashMap<String, String> = if company_user_ids.is_empty() {
        HashMap::new()
    } else {
        db.find_many::<Company>(
            collections::COMPANIES,
            doc! { "userID": { "$in": company_user_ids } },
            None,
        )
        .await?
        .into_iter()
        .map(|company| (company.user_id, company.company_name))
        .collect()
    };

    Ok(announcements
        .into_iter()
        .map(|announcement| {
            let poster = users.get(&announcement.posted_by_user_id);
            AnnouncementView {
                author_name: author_name(poster, &companies_by_user),
                posted_by_user: poster.cloned(),
                announcement,
            }
        })
        .collect())
}

async fn list_where(db: &MongoDB, filter: Document) -> Result<Vec<AnnouncementView>, AppError> {
    let announcements = db
        .find_many(collections::ANNOUNCEMENTS, filter, Some(doc! { "created_at": -1 }))
        .await?;
    to_views(db, announcements).await
}

pub async fn create_announcement(
    db: &MongoDB,
    posted_by: &str,
    request: &CreateAnnouncementRequest,
) -> Result<AnnouncementView, AppError> {
    let announcement = Announcement {
        announcement_id: new_id(),
        title: request.title.trim().to_string(),
        content: request.content.clone(),
        audience_type: request.audience_type.unwrap_or_default(),
        posted_by_user_id: posted_by.to_string(),
        created_at: now_millis(),
    };

    db.collection::<Announcement>(collections::ANNOUNCEMENTS)
        .insert_one(&announcement)
        .await?;
    log::info!(
        "📢 Announcement {} posted by {} for {}",
        announcement.announcement_id,
        posted_by,
        announcement.audience_type.as_str()
    );

    get_announcement(db, &announcement.announcement_id).await
}

pub async fn list_announcements(db: &MongoDB) -> Result<Vec<AnnouncementView>, AppError> {
    list_where(db, doc! {}).await
}

/// Announcements addressed to `audience`, including those for everyone.
pub async fn list_for_audience(db: &MongoDB, audience: AudienceType) -> Result<Vec<AnnouncementView>, AppError> {
    list_where(db, audience_filter(audience)).await
}

pub async fn list_by_user(db: &MongoDB, user_id: &str) -> Result<Vec<AnnouncementView>, AppError> {
    list_where(db, doc! { "postedByUserID": user_id }).await
}

pub async fn count(db: &MongoDB, audience: Option<AudienceType>) -> Result<u64, AppError> {
    let filter = match audience {
        Some(audience) => doc! { "audienceType": audience.as_str() },
        None => doc! {},
    };
    db.count(collections::ANNOUNCEMENTS, filter).await
}

pub async fn get_announcement(db: &MongoDB, announcement_id: &str) -> Result<AnnouncementView, AppError> {
    let announcement: Announcement = db
        .find_one(collections::ANNOUNCEMENTS, doc! { "announcementID": announcement_id })
        .await?
        .ok_or_else(|| AppError::not_found("Announcement", announcement_id))?;

    to_views(db, vec![announcement])
        .await?
        .pop()
        .ok_or_else(|| AppError::not_found("Announcement", announcement_id))
}

pub async fn update_announcement(
    db: &MongoDB,
    announcement_id: &str,
    request: &UpdateAnnouncementRequest,
) -> Result<AnnouncementView, AppError> {
    let set = request.to_set_doc();
    if !set.is_empty() {
        let result = db
            .collection::<Announcement>(collections::ANNOUNCEMENTS)
            .update_one(doc! { "announcementID": announcement_id }, doc! { "$set": set })
            .await?;
        if result.matched_count == 0 {
            return Err(AppError::not_found("Announcement", announcement_id));
        }
    }

    get_announcement(db, announcement_id).await
}

pub async fn delete_announcement(db: &MongoDB, announcement_id: &str) -> Result<(), AppError> {
    let result = db
        .collection::<Announcement>(collections::ANNOUNCEMENTS)
        .delete_one(doc! { "announcementID": announcement_id })
        .await?;
    if result.deleted_count == 0 {
        return Err(AppError::not_found("Announcement", announcement_id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, role: UserRole) -> UserInfo {
        UserInfo {
            user_id: id.into(),
            email: format!("{}@mail.com", id),
            role,
            first_name: "F".into(),
            last_name: "L".into(),
            profile_picture: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_author_name() {
        let companies: HashMap<String, String> =
            [("company-user".to_string(), "Acme".to_string())].into_iter().collect();

        let company = user("company-user", UserRole::Company);
        assert_eq!(author_name(Some(&company), &companies), "Acme");

        let admin = user("admin-user", UserRole::Admin);
        assert_eq!(author_name(Some(&admin), &companies), DEFAULT_AUTHOR);

        let orphan_company = user("no-profile", UserRole::Company);
        assert_eq!(author_name(Some(&orphan_company), &companies), DEFAULT_AUTHOR);
        assert_eq!(author_name(None, &companies), DEFAULT_AUTHOR);
    }

    #[test]
    fn test_audience_filter_includes_everyone() {
        assert_eq!(
            audience_filter(AudienceType::Students),
            doc! { "audienceType": { "$in": ["STUDENTS", "ALL"] } }
        );
        assert!(audience_filter(AudienceType::All).is_empty());
    }
}
