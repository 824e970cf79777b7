use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::user::{CreateUserRequest, UpdateUserRequest, UserInfo};
use crate::utils::error::AppError;
use crate::utils::validation::{optional_non_empty, require_non_empty, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Admin {
    #[serde(rename = "adminID")]
    pub admin_id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub designation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminDetails {
    #[serde(flatten)]
    pub admin: Admin,
    pub user: Option<UserInfo>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AdminProfileRequest {
    pub designation: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateAdminRequest {
    pub user: CreateUserRequest,
    pub admin: AdminProfileRequest,
}

impl Validate for CreateAdminRequest {
    fn validate(&self) -> Result<(), AppError> {
        self.user.validate()?;
        require_non_empty("designation", &self.admin.designation)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateAdminRequest {
    pub designation: Option<String>,
    pub user: Option<UpdateUserRequest>,
}

impl Validate for UpdateAdminRequest {
    fn validate(&self) -> Result<(), AppError> {
        optional_non_empty("designation", self.designation.as_deref())?;
        if let Some(user) = &self.user {
            user.validate()?;
        }
        Ok(())
    }
}
