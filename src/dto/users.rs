use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::User;

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewUserRequest {
    pub username: String,
    pub name: String,
    pub password: String,
    pub isadmin: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddedUserResponse {
    #[serde(rename = "addedUser")]
    pub added_user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaveResultResponse {
    #[serde(rename = "saveResult")]
    pub save_result: User,
}
