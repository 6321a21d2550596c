use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;
use super::mechanic::Mechanic;

/// Admin account. Admins only authenticate and administer; they own no jobs.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// The authenticated identity as returned to clients after login or verify.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
}

impl From<Admin> for UserInfo {
    fn from(admin: Admin) -> Self {
        UserInfo {
            id: admin.id,
            username: admin.username,
            email: admin.email,
            full_name: admin.full_name,
            role: Role::Admin,
            specialty: None,
        }
    }
}

impl From<Mechanic> for UserInfo {
    fn from(mechanic: Mechanic) -> Self {
        UserInfo {
            id: mechanic.id,
            username: mechanic.username,
            email: mechanic.email,
            full_name: mechanic.full_name,
            role: Role::Mechanic,
            specialty: mechanic.specialty,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum Role {
        Admin => "admin",
        Mechanic => "mechanic",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn admin_converts_to_user_info_without_leaking_credentials() {
        let admin = Admin {
            id: Uuid::new_v4(),
            username: "boss".to_string(),
            email: "boss@taller.test".to_string(),
            password_hash: "$2b$12$hash".to_string(),
            full_name: "Shop Owner".to_string(),
            created_at: Utc::now(),
        };

        let info = UserInfo::from(admin.clone());
        assert_eq!(info.id, admin.id);
        assert_eq!(info.role, Role::Admin);
        assert_eq!(info.specialty, None);

        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }
}
