use mongodb::bson::Document;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::utils::error::AppError;
use crate::utils::validation::{
    optional_non_empty, require_email, require_min_len, require_non_empty, require_url, Validate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Admin,
    RoomAdmin,
    Company,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Admin => "admin",
            UserRole::RoomAdmin => "room_admin",
            UserRole::Company => "company",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored account. `password` is a bcrypt hash and absent for Google accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Public view of a user, never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    pub profile_picture: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            role: user.role,
            first_name: user.first_name,
            last_name: user.last_name,
            profile_picture: user.profile_picture,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub first_name: String,
    pub last_name: String,
    pub profile_picture: Option<String>,
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_email("email", &self.email)?;
        require_non_empty("first_name", &self.first_name)?;
        require_non_empty("last_name", &self.last_name)?;
        if let Some(password) = &self.password {
            require_min_len("password", password, 6)?;
        }
        if let Some(picture) = &self.profile_picture {
            require_url("profile_picture", picture)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_picture: Option<String>,
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(email) = &self.email {
            require_email("email", email)?;
        }
        if let Some(password) = &self.password {
            require_min_len("password", password, 6)?;
        }
        optional_non_empty("first_name", self.first_name.as_deref())?;
        optional_non_empty("last_name", self.last_name.as_deref())?;
        if let Some(picture) = &self.profile_picture {
            require_url("profile_picture", picture)?;
        }
        Ok(())
    }
}

impl UpdateUserRequest {
    /// `$set` fields for the supplied values. The password is hashed by the caller.
    pub fn to_set_doc(&self) -> Document {
        let mut set = Document::new();
        if let Some(email) = &self.email {
            set.insert("email", email);
        }
        if let Some(first_name) = &self.first_name {
            set.insert("first_name", first_name);
        }
        if let Some(last_name) = &self.last_name {
            set.insert("last_name", last_name);
        }
        if let Some(picture) = &self.profile_picture {
            set.insert("profile_picture", picture);
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.password.is_none() && self.to_set_doc().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    fn create_request() -> CreateUserRequest {
        CreateUserRequest {
            email: "nimal@uni.lk".into(),
            password: Some("secret123".into()),
            role: Some(UserRole::Student),
            first_name: "Nimal".into(),
            last_name: "Perera".into(),
            profile_picture: None,
        }
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_value(UserRole::RoomAdmin).unwrap(), "room_admin");
        let role: UserRole = serde_json::from_str("\"company\"").unwrap();
        assert_eq!(role, UserRole::Company);
        assert!(serde_json::from_str::<UserRole>("\"guest\"").is_err());
    }

    #[test]
    fn test_create_validation() {
        assert!(create_request().validate().is_ok());

        let mut bad_email = create_request();
        bad_email.email = "nimal".into();
        assert!(bad_email.validate().is_err());

        let mut short_password = create_request();
        short_password.password = Some("123".into());
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_user_info_hides_password() {
        let user = User {
            user_id: "u1".into(),
            email: "a@b.co".into(),
            password: Some("$2b$10$hash".into()),
            role: UserRole::Admin,
            first_name: "A".into(),
            last_name: "B".into(),
            profile_picture: None,
            created_at: 1,
            updated_at: 1,
        };
        let json = serde_json::to_value(UserInfo::from(user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["userID"], "u1");
    }

    #[test]
    fn test_update_doc_only_has_supplied_fields() {
        let update = UpdateUserRequest {
            last_name: Some("Silva".into()),
            ..Default::default()
        };
        assert_eq!(update.to_set_doc(), doc! { "last_name": "Silva" });
        assert!(UpdateUserRequest::default().is_empty());
    }
}
