use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

/// A closed week for one mechanic. Totals are a snapshot taken at close
/// time and never recomputed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPayment {
    pub id: Uuid,
    pub mechanic_id: Uuid,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_amount: BigDecimal,
    pub total_jobs: i32,
    pub payment_status: PaymentStatus,
    pub paid_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseWeekRequest {
    /// Any date inside the week to close; defaults to today.
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum PaymentStatus {
        Pending => "pending",
        Paid => "paid",
    }
}
