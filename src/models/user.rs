use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::*;

/// User document of the `users` collection
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default = "default_user_type")]
    pub user_type: String,
    pub created_at: u64,
    pub updated_at: u64,
}

fn default_user_type() -> String {
    DEFAULT_USER_TYPE.to_owned()
}

/// User as returned to the client after login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub user_type: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        let user_type = if user.user_type.is_empty() {
            default_user_type()
        } else {
            user.user_type.clone()
        };
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            user_type,
        }
    }
}
