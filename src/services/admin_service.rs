use mongodb::bson::doc;

use crate::database::{collections, MongoDB};
use crate::models::{Admin, AdminDetails, CreateAdminRequest, UpdateAdminRequest, UserRole};
use crate::services::user_service;
use crate::utils::{error::AppError, new_id};

pub async fn create_admin(db: &MongoDB, request: &CreateAdminRequest) -> Result<AdminDetails, AppError> {
    let user = user_service::create_user(db, &request.user, UserRole::Admin).await?;

    let admin = Admin {
        admin_id: new_id(),
        user_id: user.user_id.clone(),
        designation: request.admin.designation.trim().to_string(),
    };

    if let Err(e) = db.collection::<Admin>(collections::ADMINS).insert_one(&admin).await {
        user_service::delete_user(db, &user.user_id).await?;
        return Err(e.into());
    }

    log::info!("✅ Admin created: {}", admin.admin_id);
    Ok(AdminDetails {
        admin,
        user: Some(user.into()),
    })
}

pub async fn list_admins(db: &MongoDB) -> Result<Vec<AdminDetails>, AppError> {
    let admins: Vec<Admin> = db.find_many(collections::ADMINS, doc! {}, None).await?;
    let user_ids: Vec<String> = admins.iter().map(|a| a.user_id.clone()).collect();
    let mut users = user_service::users_by_ids(db, &user_ids).await?;

    Ok(admins
        .into_iter()
        .map(|admin| AdminDetails {
            user: users.remove(&admin.user_id),
            admin,
        })
        .collect())
}

async fn require_admin(db: &MongoDB, admin_id: &str) -> Result<Admin, AppError> {
    db.find_one(collections::ADMINS, doc! { "adminID": admin_id })
        .await?
        .ok_or_else(|| AppError::not_found("Admin", admin_id))
}

pub async fn get_admin(db: &MongoDB, admin_id: &str) -> Result<AdminDetails, AppError> {
    let admin = require_admin(db, admin_id).await?;
    let user = user_service::find_user(db, &admin.user_id).await?.map(Into::into);
    Ok(AdminDetails { admin, user })
}

pub async fn get_by_user(db: &MongoDB, user_id: &str) -> Result<AdminDetails, AppError> {
    let admin: Admin = db
        .find_one(collections::ADMINS, doc! { "userID": user_id })
        .await?
        .ok_or_else(|| AppError::NotFound("Admin profile not found".to_string()))?;
    let user = user_service::find_user(db, user_id).await?.map(Into::into);
    Ok(AdminDetails { admin, user })
}

pub async fn update_admin(
    db: &MongoDB,
    admin_id: &str,
    request: &UpdateAdminRequest,
) -> Result<AdminDetails, AppError> {
    let admin = require_admin(db, admin_id).await?;

    if let Some(designation) = &request.designation {
        db.collection::<Admin>(collections::ADMINS)
            .update_one(
                doc! { "adminID": admin_id },
                doc! { "$set": { "designation": designation.trim() } },
            )
            .await?;
    }
    if let Some(user) = &request.user {
        user_service::update_user(db, &admin.user_id, user).await?;
    }

    get_admin(db, admin_id).await
}

pub async fn delete_admin(db: &MongoDB, admin_id: &str) -> Result<(), AppError> {
    let admin = require_admin(db, admin_id).await?;

    db.collection::<Admin>(collections::ADMINS)
        .delete_one(doc! { "adminID": admin_id })
        .await?;
    user_service::delete_user(db, &admin.user_id).await?;

    log::info!("🗑️  Admin deleted: {}", admin_id);
    Ok(())
}
