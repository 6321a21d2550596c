use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::{Job, JobStatus, Mechanic};
use crate::database::repositories::{JobRepository, MechanicRepository};
use crate::error::AppError;
use crate::services::week::week_bounds;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBucket {
    pub count: i64,
    pub amount: BigDecimal,
}

/// One mechanic's slice of the all-mechanics weekly rollup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanicWeekRollup {
    pub mechanic_id: Uuid,
    pub full_name: String,
    pub specialty: Option<String>,
    pub total_jobs: i64,
    pub total_amount: BigDecimal,
    pub pending_jobs: i64,
    pub completed_jobs: i64,
    pub paid_jobs: i64,
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub period: WeekPeriod,
    pub total_mechanics: usize,
    pub total_jobs: i64,
    pub grand_total: BigDecimal,
    pub mechanics: Vec<MechanicWeekRollup>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanicRef {
    pub id: Uuid,
    pub full_name: String,
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanicWeeklySummary {
    pub mechanic: MechanicRef,
    pub period: WeekPeriod,
    pub total_jobs: i64,
    pub total_amount: BigDecimal,
    pub pending: StatusBucket,
    pub completed: StatusBucket,
    pub paid: StatusBucket,
    pub jobs: Vec<Job>,
}

/// Read-only weekly rollups over the job ledger. Never writes; an empty
/// week yields empty aggregates, not an error.
#[derive(Clone)]
pub struct ReportService {
    mechanic_repository: MechanicRepository,
    job_repository: JobRepository,
}

impl ReportService {
    pub fn new(mechanic_repository: MechanicRepository, job_repository: JobRepository) -> Self {
        Self {
            mechanic_repository,
            job_repository,
        }
    }

    pub async fn weekly_summary_all(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<WeeklySummary, AppError> {
        let (week_start, week_end) = week_bounds(date);

        let jobs = self.job_repository.in_window(week_start, week_end).await?;
        let mechanics = self.mechanic_repository.list(None).await?;

        Ok(build_weekly_summary(week_start, week_end, jobs, &mechanics))
    }

    pub async fn weekly_summary_for_mechanic(
        &self,
        mechanic_id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<MechanicWeeklySummary, AppError> {
        let mechanic = self
            .mechanic_repository
            .find_by_id(mechanic_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Mechanic not found".to_string()))?;

        let (week_start, week_end) = week_bounds(date);
        let jobs = self
            .job_repository
            .for_mechanic_in_window(mechanic_id, week_start, week_end)
            .await?;

        Ok(build_mechanic_weekly_summary(
            &mechanic, week_start, week_end, jobs,
        ))
    }
}

fn bucket(jobs: &[Job], status: JobStatus) -> StatusBucket {
    let mut count = 0;
    let mut amount = BigDecimal::zero();
    for job in jobs.iter().filter(|j| j.status == status) {
        count += 1;
        amount += &job.amount;
    }
    StatusBucket { count, amount }
}

fn build_weekly_summary(
    week_start: NaiveDate,
    week_end: NaiveDate,
    jobs: Vec<Job>,
    mechanics: &[Mechanic],
) -> WeeklySummary {
    let names: HashMap<Uuid, &Mechanic> = mechanics.iter().map(|m| (m.id, m)).collect();

    let mut grouped: HashMap<Uuid, Vec<Job>> = HashMap::new();
    for job in jobs {
        grouped.entry(job.mechanic_id).or_default().push(job);
    }

    let mut rollups: Vec<MechanicWeekRollup> = grouped
        .into_iter()
        .map(|(mechanic_id, jobs)| {
            let mut total_amount = BigDecimal::zero();
            for job in &jobs {
                total_amount += &job.amount;
            }
            let (full_name, specialty) = names
                .get(&mechanic_id)
                .map(|m| (m.full_name.clone(), m.specialty.clone()))
                .unwrap_or_else(|| ("(removed)".to_string(), None));

            MechanicWeekRollup {
                mechanic_id,
                full_name,
                specialty,
                total_jobs: jobs.len() as i64,
                total_amount,
                pending_jobs: jobs.iter().filter(|j| j.status == JobStatus::Pending).count() as i64,
                completed_jobs: jobs
                    .iter()
                    .filter(|j| j.status == JobStatus::Completed)
                    .count() as i64,
                paid_jobs: jobs.iter().filter(|j| j.status == JobStatus::Paid).count() as i64,
                jobs,
            }
        })
        .collect();

    // Deterministic output order regardless of hash-map iteration
    rollups.sort_by(|a, b| a.full_name.cmp(&b.full_name));

    let total_jobs = rollups.iter().map(|r| r.total_jobs).sum();
    let mut grand_total = BigDecimal::zero();
    for rollup in &rollups {
        grand_total += &rollup.total_amount;
    }

    WeeklySummary {
        period: WeekPeriod {
            start: week_start,
            end: week_end,
        },
        total_mechanics: rollups.len(),
        total_jobs,
        grand_total,
        mechanics: rollups,
    }
}

fn build_mechanic_weekly_summary(
    mechanic: &Mechanic,
    week_start: NaiveDate,
    week_end: NaiveDate,
    jobs: Vec<Job>,
) -> MechanicWeeklySummary {
    let mut total_amount = BigDecimal::zero();
    for job in &jobs {
        total_amount += &job.amount;
    }

    MechanicWeeklySummary {
        mechanic: MechanicRef {
            id: mechanic.id,
            full_name: mechanic.full_name.clone(),
            specialty: mechanic.specialty.clone(),
        },
        period: WeekPeriod {
            start: week_start,
            end: week_end,
        },
        total_jobs: jobs.len() as i64,
        total_amount,
        pending: bucket(&jobs, JobStatus::Pending),
        completed: bucket(&jobs, JobStatus::Completed),
        paid: bucket(&jobs, JobStatus::Paid),
        jobs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::MechanicStatus;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn mechanic(name: &str) -> Mechanic {
        let now = Utc::now();
        Mechanic {
            id: Uuid::new_v4(),
            username: name.to_lowercase(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: "$2b$12$hash".to_string(),
            full_name: name.to_string(),
            phone: None,
            specialty: Some("engines".to_string()),
            hire_date: None,
            status: MechanicStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn job_for(mechanic_id: Uuid, amount: &str, status: JobStatus) -> Job {
        let now = Utc::now();
        Job {
            id: Uuid::new_v4(),
            mechanic_id,
            description: "oil change".to_string(),
            amount: BigDecimal::from_str(amount).unwrap(),
            job_date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
            status,
            vehicle_info: None,
            notes: None,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    fn week() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 8).unwrap(),
        )
    }

    #[test]
    fn empty_week_yields_empty_aggregates_not_an_error() {
        let (start, end) = week();
        let summary = build_weekly_summary(start, end, vec![], &[]);

        assert_eq!(summary.total_mechanics, 0);
        assert_eq!(summary.total_jobs, 0);
        assert_eq!(summary.grand_total, BigDecimal::zero());
        assert!(summary.mechanics.is_empty());
    }

    #[test]
    fn jobs_are_grouped_per_mechanic_with_status_counts() {
        let (start, end) = week();
        let ana = mechanic("Ana");
        let bruno = mechanic("Bruno");

        let jobs = vec![
            job_for(ana.id, "50.00", JobStatus::Completed),
            job_for(ana.id, "30.00", JobStatus::Pending),
            job_for(bruno.id, "20.00", JobStatus::Paid),
        ];

        let summary =
            build_weekly_summary(start, end, jobs, &[ana.clone(), bruno.clone()]);

        assert_eq!(summary.total_mechanics, 2);
        assert_eq!(summary.total_jobs, 3);
        assert_eq!(summary.grand_total, BigDecimal::from_str("100.00").unwrap());

        let ana_rollup = &summary.mechanics[0];
        assert_eq!(ana_rollup.full_name, "Ana");
        assert_eq!(ana_rollup.total_jobs, 2);
        assert_eq!(ana_rollup.pending_jobs, 1);
        assert_eq!(ana_rollup.completed_jobs, 1);
        assert_eq!(ana_rollup.paid_jobs, 0);
        assert_eq!(
            ana_rollup.total_amount,
            BigDecimal::from_str("80.00").unwrap()
        );

        let bruno_rollup = &summary.mechanics[1];
        assert_eq!(bruno_rollup.full_name, "Bruno");
        assert_eq!(bruno_rollup.paid_jobs, 1);
    }

    #[test]
    fn mechanic_summary_buckets_amounts_by_status() {
        let (start, end) = week();
        let ana = mechanic("Ana");

        let jobs = vec![
            job_for(ana.id, "50.00", JobStatus::Completed),
            job_for(ana.id, "30.00", JobStatus::Pending),
            job_for(ana.id, "20.00", JobStatus::Paid),
        ];

        let summary = build_mechanic_weekly_summary(&ana, start, end, jobs);

        assert_eq!(summary.total_jobs, 3);
        assert_eq!(
            summary.total_amount,
            BigDecimal::from_str("100.00").unwrap()
        );
        assert_eq!(summary.pending.count, 1);
        assert_eq!(summary.pending.amount, BigDecimal::from_str("30.00").unwrap());
        assert_eq!(summary.completed.count, 1);
        assert_eq!(
            summary.completed.amount,
            BigDecimal::from_str("50.00").unwrap()
        );
        assert_eq!(summary.paid.count, 1);
        assert_eq!(summary.paid.amount, BigDecimal::from_str("20.00").unwrap());
    }

    #[test]
    fn mechanic_summary_of_an_empty_week_is_all_zero() {
        let (start, end) = week();
        let ana = mechanic("Ana");

        let summary = build_mechanic_weekly_summary(&ana, start, end, vec![]);

        assert_eq!(summary.total_jobs, 0);
        assert_eq!(summary.total_amount, BigDecimal::zero());
        assert_eq!(summary.pending.count, 0);
        assert_eq!(summary.completed.count, 0);
        assert_eq!(summary.paid.count, 0);
        assert!(summary.jobs.is_empty());
    }
}
