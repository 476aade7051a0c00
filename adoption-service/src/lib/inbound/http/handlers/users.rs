use serde::Serialize;

use crate::user::models::User;

pub mod delete_user;
pub mod get_user;
pub mod list_users;
pub mod update_user;

/// User representation shared by every user-facing payload. The password
/// hash is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub roles: Vec<String>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            username: user.username.as_str().to_string(),
            name: user.name.clone(),
            email: user.email.as_str().to_string(),
            phone: user.phone.clone(),
            roles: user.roles.iter().map(|r| r.granted_name().to_string()).collect(),
        }
    }
}
