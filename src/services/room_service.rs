use mongodb::bson::doc;
use std::collections::HashMap;

use crate::database::{collections, MongoDB};
use crate::models::{
    CreateRoomAdminRequest, CreateRoomRequest, Room, RoomAdmin, RoomAdminDetails,
    UpdateRoomAdminRequest, UpdateRoomRequest, UserRole,
};
use crate::services::user_service;
use crate::utils::{error::AppError, new_id, now_millis};

// ==================== ROOMS ====================

pub async fn create_room(db: &MongoDB, request: &CreateRoomRequest) -> Result<Room, AppError> {
    let room = Room {
        room_id: new_id(),
        room_name: request.room_name.trim().to_string(),
        location: request.location.trim().to_string(),
        is_active: request.is_active.unwrap_or(false),
        created_at: now_millis(),
    };

    db.collection::<Room>(collections::ROOMS).insert_one(&room).await?;
    log::info!("✅ Room created: {} ({})", room.room_name, room.room_id);
    Ok(room)
}

pub async fn list_rooms(db: &MongoDB) -> Result<Vec<Room>, AppError> {
    db.find_many(collections::ROOMS, doc! {}, Some(doc! { "roomName": 1 }))
        .await
}

pub async fn find_room(db: &MongoDB, room_id: &str) -> Result<Option<Room>, AppError> {
    db.find_one(collections::ROOMS, doc! { "roomID": room_id }).await
}

pub async fn get_room(db: &MongoDB, room_id: &str) -> Result<Room, AppError> {
    find_room(db, room_id)
        .await?
        .ok_or_else(|| AppError::not_found("Room", room_id))
}

/// Only the supplied fields change. An empty body is a 400.
pub async fn update_room(db: &MongoDB, room_id: &str, request: &UpdateRoomRequest) -> Result<Room, AppError> {
    let set = request.to_set_doc();
    if set.is_empty() {
        return Err(AppError::Validation("No fields to update".to_string()));
    }

    let result = db
        .collection::<Room>(collections::ROOMS)
        .update_one(doc! { "roomID": room_id }, doc! { "$set": set })
        .await?;
    if result.matched_count == 0 {
        return Err(AppError::not_found("Room", room_id));
    }

    get_room(db, room_id).await
}

pub async fn delete_room(db: &MongoDB, room_id: &str) -> Result<(), AppError> {
    let result = db
        .collection::<Room>(collections::ROOMS)
        .delete_one(doc! { "roomID": room_id })
        .await?;
    if result.deleted_count == 0 {
        return Err(AppError::not_found("Room", room_id));
    }

    // Room admins keep their account but lose the assignment
    db.collection::<RoomAdmin>(collections::ROOM_ADMINS)
        .update_many(doc! { "roomID": room_id }, doc! { "$set": { "roomID": null } })
        .await?;

    log::info!("🗑️  Room deleted: {}", room_id);
    Ok(())
}

pub async fn rooms_by_ids(db: &MongoDB, ids: &[String]) -> Result<HashMap<String, Room>, AppError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rooms: Vec<Room> = db
        .find_many(collections::ROOMS, doc! { "roomID": { "$in": ids.to_vec() } }, None)
        .await?;
    Ok(rooms.into_iter().map(|room| (room.room_id.clone(), room)).collect())
}

// ==================== ROOM ADMINS ====================

async fn with_relations(db: &MongoDB, admins: Vec<RoomAdmin>) -> Result<Vec<RoomAdminDetails>, AppError> {
    let user_ids: Vec<String> = admins.iter().map(|a| a.user_id.clone()).collect();
    let room_ids: Vec<String> = admins.iter().filter_map(|a| a.room_id.clone()).collect();
    let mut users = user_service::users_by_ids(db, &user_ids).await?;
    let rooms = rooms_by_ids(db, &room_ids).await?;

    Ok(admins
        .into_iter()
        .map(|room_admin| RoomAdminDetails {
            user: users.remove(&room_admin.user_id),
            room: room_admin.room_id.as_ref().and_then(|id| rooms.get(id).cloned()),
            room_admin,
        })
        .collect())
}

async fn one_with_relations(db: &MongoDB, room_admin: RoomAdmin) -> Result<RoomAdminDetails, AppError> {
    with_relations(db, vec![room_admin])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("Room admin vanished while loading".to_string()))
}

async fn ensure_room(db: &MongoDB, room_id: Option<&str>) -> Result<(), AppError> {
    if let Some(room_id) = room_id {
        get_room(db, room_id).await?;
    }
    Ok(())
}

pub async fn create_room_admin(
    db: &MongoDB,
    request: &CreateRoomAdminRequest,
) -> Result<RoomAdminDetails, AppError> {
    let profile = &request.room_admin;
    ensure_room(db, profile.room_id.as_deref()).await?;

    let user = user_service::create_user(db, &request.user, UserRole::RoomAdmin).await?;
    let room_admin = RoomAdmin {
        room_admin_id: new_id(),
        user_id: user.user_id.clone(),
        designation: profile.designation.trim().to_string(),
        contact: profile.contact.clone(),
        room_id: profile.room_id.clone(),
    };

    if let Err(e) = db
        .collection::<RoomAdmin>(collections::ROOM_ADMINS)
        .insert_one(&room_admin)
        .await
    {
        user_service::delete_user(db, &user.user_id).await?;
        return Err(e.into());
    }

    log::info!("✅ Room admin created: {}", room_admin.room_admin_id);
    one_with_relations(db, room_admin).await
}

pub async fn list_room_admins(db: &MongoDB) -> Result<Vec<RoomAdminDetails>, AppError> {
    let admins = db.find_many(collections::ROOM_ADMINS, doc! {}, None).await?;
    with_relations(db, admins).await
}

async fn require_room_admin(db: &MongoDB, room_admin_id: &str) -> Result<RoomAdmin, AppError> {
    db.find_one(collections::ROOM_ADMINS, doc! { "roomAdminID": room_admin_id })
        .await?
        .ok_or_else(|| AppError::not_found("Room admin", room_admin_id))
}

pub async fn get_room_admin(db: &MongoDB, room_admin_id: &str) -> Result<RoomAdminDetails, AppError> {
    let room_admin = require_room_admin(db, room_admin_id).await?;
    one_with_relations(db, room_admin).await
}

pub async fn get_room_admin_by_user(db: &MongoDB, user_id: &str) -> Result<RoomAdminDetails, AppError> {
    let room_admin: RoomAdmin = db
        .find_one(collections::ROOM_ADMINS, doc! { "userID": user_id })
        .await?
        .ok_or_else(|| AppError::NotFound("Room admin profile not found".to_string()))?;
    one_with_relations(db, room_admin).await
}

pub async fn list_room_admins_by_room(db: &MongoDB, room_id: &str) -> Result<Vec<RoomAdminDetails>, AppError> {
    let admins = db
        .find_many(collections::ROOM_ADMINS, doc! { "roomID": room_id }, None)
        .await?;
    with_relations(db, admins).await
}

pub async fn update_room_admin(
    db: &MongoDB,
    room_admin_id: &str,
    request: &UpdateRoomAdminRequest,
) -> Result<RoomAdminDetails, AppError> {
    let room_admin = require_room_admin(db, room_admin_id).await?;
    ensure_room(db, request.room_id.as_deref()).await?;

    let set = request.to_set_doc();
    if !set.is_empty() {
        db.collection::<RoomAdmin>(collections::ROOM_ADMINS)
            .update_one(doc! { "roomAdminID": room_admin_id }, doc! { "$set": set })
            .await?;
    }
    if let Some(user) = &request.user {
        user_service::update_user(db, &room_admin.user_id, user).await?;
    }

    get_room_admin(db, room_admin_id).await
}

pub async fn delete_room_admin(db: &MongoDB, room_admin_id: &str) -> Result<(), AppError> {
    let room_admin = require_room_admin(db, room_admin_id).await?;

    db.collection::<RoomAdmin>(collections::ROOM_ADMINS)
        .delete_one(doc! { "roomAdminID": room_admin_id })
        .await?;
    user_service::delete_user(db, &room_admin.user_id).await?;

    log::info!("🗑️  Room admin deleted: {}", room_admin_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_patch_room_keeps_unsupplied_fields() {
        dotenv::dotenv().ok();
        let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| "mongodb://localhost:27017".into());
        let db = MongoDB::new(&url, "industry_day_test").await.unwrap();

        let room = create_room(
            &db,
            &CreateRoomRequest {
                room_name: "Hall B".into(),
                location: "Main Building".into(),
                is_active: None,
            },
        )
        .await
        .unwrap();
        assert!(!room.is_active);

        let patch = UpdateRoomRequest {
            is_active: Some(true),
            ..Default::default()
        };
        let updated = update_room(&db, &room.room_id, &patch).await.unwrap();
        assert!(updated.is_active);
        assert_eq!(updated.room_name, "Hall B");
        assert_eq!(updated.location, "Main Building");

        let empty = update_room(&db, &room.room_id, &UpdateRoomRequest::default()).await;
        assert!(matches!(empty, Err(AppError::Validation(_))));

        delete_room(&db, &room.room_id).await.unwrap();
        assert!(matches!(get_room(&db, &room.room_id).await, Err(AppError::NotFound(_))));
    }
}
