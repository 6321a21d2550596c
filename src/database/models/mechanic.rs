use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

/// Full mechanic row, including the password hash. Never serialized to
/// clients directly; use [`MechanicInfo`] for responses.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Mechanic {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub specialty: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub status: MechanicStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mechanic {
    pub fn is_active(&self) -> bool {
        self.status == MechanicStatus::Active
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanicInfo {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub specialty: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub status: MechanicStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Mechanic> for MechanicInfo {
    fn from(m: Mechanic) -> Self {
        MechanicInfo {
            id: m.id,
            username: m.username,
            email: m.email,
            full_name: m.full_name,
            phone: m.phone,
            specialty: m.specialty,
            hire_date: m.hire_date,
            status: m.status,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMechanicRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub specialty: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

/// Partial update: absent fields are left untouched.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMechanicRequest {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub specialty: Option<String>,
    pub status: Option<MechanicStatus>,
}

/// Lifetime rollup across every job a mechanic has on record.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MechanicStats {
    pub total_jobs: i64,
    pub total_amount: bigdecimal::BigDecimal,
    pub pending_jobs: i64,
    pub completed_jobs: i64,
    pub paid_jobs: i64,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum MechanicStatus {
        Active => "active",
        Inactive => "inactive",
    }
}
