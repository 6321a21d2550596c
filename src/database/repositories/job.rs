use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{CreateJobRequest, Job, JobStatus, UpdateJobRequest};

const JOB_COLUMNS: &str = r#"
    id,
    mechanic_id,
    description,
    amount,
    job_date,
    status,
    vehicle_info,
    notes,
    created_by,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &CreateJobRequest, created_by: Uuid) -> Result<Job> {
        let now = Utc::now();
        let job_date = input.job_date.unwrap_or_else(|| now.date_naive());
        let status = input.status.unwrap_or(JobStatus::Pending);

        let job = sqlx::query_as::<_, Job>(&format!(
            r#"
            INSERT INTO
                jobs (
                    mechanic_id,
                    description,
                    amount,
                    job_date,
                    status,
                    vehicle_info,
                    notes,
                    created_by,
                    created_at,
                    updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(input.mechanic_id)
        .bind(&input.description)
        .bind(&input.amount)
        .bind(job_date)
        .bind(status)
        .bind(&input.vehicle_info)
        .bind(&input.notes)
        .bind(created_by)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(job)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    /// Partial update; absent fields keep their current value.
    pub async fn update_fields(&self, id: Uuid, input: &UpdateJobRequest) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET
                description = COALESCE($1, description),
                amount = COALESCE($2, amount),
                job_date = COALESCE($3, job_date),
                vehicle_info = COALESCE($4, vehicle_info),
                notes = COALESCE($5, notes),
                status = COALESCE($6, status),
                updated_at = $7
            WHERE
                id = $8
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(&input.description)
        .bind(&input.amount)
        .bind(input.job_date)
        .bind(&input.vehicle_info)
        .bind(&input.notes)
        .bind(input.status.map(|s| s.to_string()))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    pub async fn update_status(&self, id: Uuid, status: JobStatus) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET status = $1, updated_at = $2
            WHERE id = $3
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List jobs, most recent date first, with optional filters.
    #[allow(clippy::too_many_arguments)]
    pub async fn list(
        &self,
        mechanic_id: Option<Uuid>,
        status: Option<JobStatus>,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE
                ($1::uuid IS NULL OR mechanic_id = $1)
                AND ($2::varchar IS NULL OR status = $2)
                AND ($3::date IS NULL OR job_date >= $3)
                AND ($4::date IS NULL OR job_date <= $4)
            ORDER BY job_date DESC, created_at DESC
            LIMIT $5 OFFSET $6
            "#
        ))
        .bind(mechanic_id)
        .bind(status.map(|s| s.to_string()))
        .bind(date_from)
        .bind(date_to)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }

    /// Jobs whose date matches exactly (calendar-day match, not a range).
    pub async fn for_date(&self, date: NaiveDate) -> Result<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE job_date = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }

    /// All of one mechanic's jobs inside an inclusive date window.
    pub async fn for_mechanic_in_window(
        &self,
        mechanic_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE
                mechanic_id = $1
                AND job_date BETWEEN $2 AND $3
            ORDER BY job_date ASC
            "#
        ))
        .bind(mechanic_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }

    /// Every job in an inclusive date window, across all mechanics.
    pub async fn in_window(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS}
            FROM jobs
            WHERE job_date BETWEEN $1 AND $2
            ORDER BY job_date ASC
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }
}
