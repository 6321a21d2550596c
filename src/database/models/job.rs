use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub mechanic_id: Uuid,
    pub description: String,
    pub amount: BigDecimal,
    pub job_date: NaiveDate,
    pub status: JobStatus,
    pub vehicle_info: Option<String>,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub mechanic_id: Uuid,
    pub description: String,
    pub amount: BigDecimal,
    pub job_date: Option<NaiveDate>,
    pub vehicle_info: Option<String>,
    pub notes: Option<String>,
    pub status: Option<JobStatus>,
}

/// Partial update: absent fields are left untouched, not nulled.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    pub description: Option<String>,
    pub amount: Option<BigDecimal>,
    pub job_date: Option<NaiveDate>,
    pub vehicle_info: Option<String>,
    pub notes: Option<String>,
    pub status: Option<JobStatus>,
}

/// Status carried as a raw string so an unknown value surfaces as a
/// validation error instead of a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateJobStatusRequest {
    pub status: String,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum JobStatus {
        Pending => "pending",
        Completed => "completed",
        Paid => "paid",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn job_status_parses_known_values_only() {
        assert_eq!("pending".parse::<JobStatus>(), Ok(JobStatus::Pending));
        assert_eq!("Completed".parse::<JobStatus>(), Ok(JobStatus::Completed));
        assert_eq!("PAID".parse::<JobStatus>(), Ok(JobStatus::Paid));
        assert!("cancelled".parse::<JobStatus>().is_err());
        assert!("".parse::<JobStatus>().is_err());
    }

    #[test]
    fn job_status_round_trips_through_display() {
        for status in [JobStatus::Pending, JobStatus::Completed, JobStatus::Paid] {
            assert_eq!(status.to_string().parse::<JobStatus>(), Ok(status));
        }
    }
}
