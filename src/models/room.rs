use mongodb::bson::Document;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::user::{CreateUserRequest, UpdateUserRequest, UserInfo};
use crate::utils::error::AppError;
use crate::utils::validation::{optional_non_empty, require_non_empty, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(rename = "roomID")]
    pub room_id: String,
    pub room_name: String,
    pub location: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(rename = "created_at")]
    pub created_at: i64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub room_name: String,
    pub location: String,
    pub is_active: Option<bool>,
}

impl Validate for CreateRoomRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("roomName", &self.room_name)?;
        require_non_empty("location", &self.location)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoomRequest {
    pub room_name: Option<String>,
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

impl Validate for UpdateRoomRequest {
    fn validate(&self) -> Result<(), AppError> {
        optional_non_empty("roomName", self.room_name.as_deref())?;
        optional_non_empty("location", self.location.as_deref())
    }
}

impl UpdateRoomRequest {
    pub fn to_set_doc(&self) -> Document {
        let mut set = Document::new();
        if let Some(room_name) = &self.room_name {
            set.insert("roomName", room_name);
        }
        if let Some(location) = &self.location {
            set.insert("location", location);
        }
        if let Some(is_active) = self.is_active {
            set.insert("isActive", is_active);
        }
        set
    }
}

// ==================== ROOM ADMIN ====================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomAdmin {
    #[serde(rename = "roomAdminID")]
    pub room_admin_id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub designation: String,
    pub contact: Option<String>,
    #[serde(rename = "roomID")]
    pub room_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoomAdminDetails {
    #[serde(flatten)]
    pub room_admin: RoomAdmin,
    pub user: Option<UserInfo>,
    pub room: Option<Room>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RoomAdminProfileRequest {
    pub designation: String,
    pub contact: Option<String>,
    #[serde(rename = "roomID")]
    pub room_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRoomAdminRequest {
    pub user: CreateUserRequest,
    #[serde(rename = "roomAdmin")]
    pub room_admin: RoomAdminProfileRequest,
}

impl Validate for CreateRoomAdminRequest {
    fn validate(&self) -> Result<(), AppError> {
        self.user.validate()?;
        require_non_empty("designation", &self.room_admin.designation)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateRoomAdminRequest {
    pub designation: Option<String>,
    pub contact: Option<String>,
    #[serde(rename = "roomID")]
    pub room_id: Option<String>,
    pub user: Option<UpdateUserRequest>,
}

impl Validate for UpdateRoomAdminRequest {
    fn validate(&self) -> Result<(), AppError> {
        optional_non_empty("designation", self.designation.as_deref())?;
        if let Some(user) = &self.user {
            user.validate()?;
        }
        Ok(())
    }
}

impl UpdateRoomAdminRequest {
    pub fn to_set_doc(&self) -> Document {
        let mut set = Document::new();
        if let Some(designation) = &self.designation {
            set.insert("designation", designation);
        }
        if let Some(contact) = &self.contact {
            set.insert("contact", contact);
        }
        if let Some(room_id) = &self.room_id {
            set.insert("roomID", room_id);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_room_defaults_to_inactive() {
        let room: Room = serde_json::from_value(serde_json::json!({
            "roomID": "r1",
            "roomName": "Hall A",
            "location": "Science Faculty",
            "created_at": 0
        }))
        .unwrap();
        assert!(!room.is_active);
    }

    #[test]
    fn test_room_patch_only_sets_supplied_fields() {
        let update = UpdateRoomRequest {
            is_active: Some(true),
            ..Default::default()
        };
        assert_eq!(update.to_set_doc(), doc! { "isActive": true });
        assert!(UpdateRoomRequest::default().to_set_doc().is_empty());
    }

    #[test]
    fn test_room_admin_request_field_names() {
        let request: CreateRoomAdminRequest = serde_json::from_value(serde_json::json!({
            "user": {
                "email": "ra@uni.lk",
                "first_name": "Room",
                "last_name": "Admin"
            },
            "roomAdmin": { "designation": "Coordinator", "roomID": "r1" }
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.room_admin.room_id.as_deref(), Some("r1"));
    }
}
