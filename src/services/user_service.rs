use mongodb::bson::doc;
use std::collections::HashMap;

use crate::database::{collections, MongoDB};
use crate::models::{CreateUserRequest, UpdateUserRequest, User, UserInfo, UserRole};
use crate::utils::{error::AppError, new_id, now_millis};

pub const BCRYPT_COST: u32 = 10;
pub const EMAIL_EXISTS: &str = "Email already exists";

pub fn hash_password(password: &str) -> Result<String, AppError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Creates an account with `role`. Duplicate e-mails are rejected with 409.
pub async fn create_user(
    db: &MongoDB,
    request: &CreateUserRequest,
    role: UserRole,
) -> Result<User, AppError> {
    let email = request.email.trim().to_lowercase();

    if find_user_by_email(db, &email).await?.is_some() {
        return Err(AppError::Conflict(EMAIL_EXISTS.to_string()));
    }

    let password = match &request.password {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let now = now_millis();
    let user = User {
        user_id: new_id(),
        email,
        password,
        role,
        first_name: request.first_name.trim().to_string(),
        last_name: request.last_name.trim().to_string(),
        profile_picture: request.profile_picture.clone(),
        created_at: now,
        updated_at: now,
    };

    db.collection::<User>(collections::USERS)
        .insert_one(&user)
        .await
        .map_err(|e| AppError::from_write(e, EMAIL_EXISTS))?;

    log::info!("✅ User created: {} ({})", user.user_id, user.role);
    Ok(user)
}

pub async fn find_user(db: &MongoDB, user_id: &str) -> Result<Option<User>, AppError> {
    db.find_one(collections::USERS, doc! { "userID": user_id }).await
}

pub async fn find_user_by_email(db: &MongoDB, email: &str) -> Result<Option<User>, AppError> {
    db.find_one(collections::USERS, doc! { "email": email.trim().to_lowercase() })
        .await
}

pub async fn get_user(db: &MongoDB, user_id: &str) -> Result<UserInfo, AppError> {
    find_user(db, user_id)
        .await?
        .map(UserInfo::from)
        .ok_or_else(|| AppError::not_found("User", user_id))
}

pub async fn list_users(db: &MongoDB) -> Result<Vec<UserInfo>, AppError> {
    let users: Vec<User> = db
        .find_many(collections::USERS, doc! {}, Some(doc! { "created_at": -1 }))
        .await?;
    Ok(users.into_iter().map(UserInfo::from).collect())
}

pub async fn list_user_ids_by_role(db: &MongoDB, role: UserRole) -> Result<Vec<String>, AppError> {
    let users: Vec<User> = db
        .find_many(collections::USERS, doc! { "role": role.as_str() }, None)
        .await?;
    Ok(users.into_iter().map(|user| user.user_id).collect())
}

/// Applies the supplied fields. Returns 404 when the user is gone.
pub async fn update_user(
    db: &MongoDB,
    user_id: &str,
    request: &UpdateUserRequest,
) -> Result<(), AppError> {
    if request.is_empty() {
        return Ok(());
    }

    let mut set = request.to_set_doc();
    if let Some(email) = &request.email {
        let email = email.trim().to_lowercase();
        if let Some(existing) = find_user_by_email(db, &email).await? {
            if existing.user_id != user_id {
                return Err(AppError::Conflict(EMAIL_EXISTS.to_string()));
            }
        }
        set.insert("email", email);
    }
    if let Some(password) = &request.password {
        set.insert("password", hash_password(password)?);
    }
    set.insert("updated_at", now_millis());

    let result = db
        .collection::<User>(collections::USERS)
        .update_one(doc! { "userID": user_id }, doc! { "$set": set })
        .await
        .map_err(|e| AppError::from_write(e, EMAIL_EXISTS))?;

    if result.matched_count == 0 {
        return Err(AppError::not_found("User", user_id));
    }
    Ok(())
}

pub async fn delete_user(db: &MongoDB, user_id: &str) -> Result<bool, AppError> {
    let result = db
        .collection::<User>(collections::USERS)
        .delete_one(doc! { "userID": user_id })
        .await?;
    Ok(result.deleted_count > 0)
}

/// Loads the public views of `ids`, keyed by userID.
pub async fn users_by_ids(db: &MongoDB, ids: &[String]) -> Result<HashMap<String, UserInfo>, AppError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let users: Vec<User> = db
        .find_many(collections::USERS, doc! { "userID": { "$in": ids.to_vec() } }, None)
        .await?;

    Ok(users
        .into_iter()
        .map(|user| (user.user_id.clone(), UserInfo::from(user)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_verifies() {
        let hash = hash_password("secret123").unwrap();
        assert!(hash.starts_with("$2"));
        assert!(bcrypt::verify("secret123", &hash).unwrap());
        assert!(!bcrypt::verify("wrong", &hash).unwrap());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_duplicate_email_is_conflict() {
        dotenv::dotenv().ok();
        let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| "mongodb://localhost:27017".into());
        let db = MongoDB::new(&url, "industry_day_test").await.unwrap();

        let request = CreateUserRequest {
            email: format!("dup-{}@uni.lk", new_id()),
            password: Some("secret123".into()),
            role: None,
            first_name: "Dup".into(),
            last_name: "User".into(),
            profile_picture: None,
        };

        let user = create_user(&db, &request, UserRole::Student).await.unwrap();
        let second = create_user(&db, &request, UserRole::Company).await;
        assert!(matches!(second, Err(AppError::Conflict(ref msg)) if msg == EMAIL_EXISTS));

        assert!(delete_user(&db, &user.user_id).await.unwrap());
    }
}
