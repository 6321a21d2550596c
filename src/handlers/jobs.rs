use actix_web::{web, HttpResponse};
use bigdecimal::{BigDecimal, Zero};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{require_admin, require_self_or_admin, Claims};
use crate::database::models::{
    CreateJobRequest, Job, JobStatus, UpdateJobRequest, UpdateJobStatusRequest,
};
use crate::database::repositories::{JobRepository, MechanicRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListQuery {
    pub mechanic_id: Option<Uuid>,
    pub status: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanicJobsQuery {
    pub status: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct DailySummaryQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
    pub total: usize,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub pending: usize,
    pub completed: usize,
    pub paid: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanicJobsSummary {
    pub total_jobs: usize,
    pub total_amount: BigDecimal,
    pub by_status: StatusCounts,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanicJobsResponse {
    pub jobs: Vec<Job>,
    pub summary: MechanicJobsSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_jobs: usize,
    pub total_amount: BigDecimal,
    pub jobs: Vec<Job>,
}

fn parse_status(raw: Option<&str>) -> Result<Option<JobStatus>, AppError> {
    raw.map(|s| {
        s.parse::<JobStatus>().map_err(|_| {
            AppError::Validation("Invalid status. Must be: pending, completed or paid".to_string())
        })
    })
    .transpose()
}

/// Record a new billable job for a mechanic (admin only)
pub async fn create_job(
    claims: Claims,
    job_repo: web::Data<JobRepository>,
    mechanic_repo: web::Data<MechanicRepository>,
    input: web::Json<CreateJobRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&claims)?;

    if input.amount < BigDecimal::zero() {
        return Err(AppError::Validation(
            "Amount must be a non-negative number".to_string(),
        ));
    }

    let mechanic = mechanic_repo
        .find_by_id(input.mechanic_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Mechanic not found".to_string()))?;

    if !mechanic.is_active() {
        return Err(AppError::InvalidState(
            "Jobs cannot be assigned to an inactive mechanic".to_string(),
        ));
    }

    let job = job_repo.create(&input, claims.user_id()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(job)))
}

/// List jobs with optional filters (admin only)
pub async fn get_jobs(
    claims: Claims,
    repo: web::Data<JobRepository>,
    query: web::Query<JobListQuery>,
) -> Result<HttpResponse, AppError> {
    require_admin(&claims)?;

    let status = parse_status(query.status.as_deref())?;
    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let offset = query.offset.unwrap_or(0).max(0);

    let jobs = repo
        .list(
            query.mechanic_id,
            status,
            query.date_from,
            query.date_to,
            limit,
            offset,
        )
        .await?;

    let total = jobs.len();
    Ok(HttpResponse::Ok().json(ApiResponse::success(JobListResponse {
        jobs,
        total,
        limit,
        offset,
    })))
}

/// Get one job by id (any authenticated caller)
pub async fn get_job(
    _claims: Claims,
    repo: web::Data<JobRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let job = repo
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(job)))
}

/// A mechanic's jobs plus a per-status summary (self or admin)
pub async fn get_jobs_by_mechanic(
    claims: Claims,
    repo: web::Data<JobRepository>,
    path: web::Path<Uuid>,
    query: web::Query<MechanicJobsQuery>,
) -> Result<HttpResponse, AppError> {
    let mechanic_id = path.into_inner();
    require_self_or_admin(&claims, mechanic_id)?;

    let status = parse_status(query.status.as_deref())?;
    let jobs = repo
        .list(
            Some(mechanic_id),
            status,
            query.date_from,
            query.date_to,
            i64::MAX,
            0,
        )
        .await?;

    let mut total_amount = BigDecimal::zero();
    for job in &jobs {
        total_amount += &job.amount;
    }

    let summary = MechanicJobsSummary {
        total_jobs: jobs.len(),
        total_amount,
        by_status: StatusCounts {
            pending: jobs.iter().filter(|j| j.status == JobStatus::Pending).count(),
            completed: jobs
                .iter()
                .filter(|j| j.status == JobStatus::Completed)
                .count(),
            paid: jobs.iter().filter(|j| j.status == JobStatus::Paid).count(),
        },
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(MechanicJobsResponse { jobs, summary })))
}

/// Partially update a job; absent fields are untouched (admin only)
pub async fn update_job(
    claims: Claims,
    repo: web::Data<JobRepository>,
    path: web::Path<Uuid>,
    input: web::Json<UpdateJobRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&claims)?;

    if let Some(amount) = &input.amount {
        if *amount < BigDecimal::zero() {
            return Err(AppError::Validation(
                "Amount must be a non-negative number".to_string(),
            ));
        }
    }

    let job = repo
        .update_fields(path.into_inner(), &input)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(job)))
}

/// Set a job's status (admin only). Any of the three statuses may be
/// requested; the ledger records the value without enforcing forward-only
/// movement (the settlement engine guards its own transitions).
pub async fn update_job_status(
    claims: Claims,
    repo: web::Data<JobRepository>,
    path: web::Path<Uuid>,
    input: web::Json<UpdateJobStatusRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&claims)?;

    let status = input.status.parse::<JobStatus>().map_err(|_| {
        AppError::Validation("Invalid status. Must be: pending, completed or paid".to_string())
    })?;

    let job = repo
        .update_status(path.into_inner(), status)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(job)))
}

/// Delete a job (admin only)
pub async fn delete_job(
    claims: Claims,
    repo: web::Data<JobRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    require_admin(&claims)?;

    if !repo.delete(path.into_inner()).await? {
        return Err(AppError::NotFound("Job not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
        None,
        "Job deleted successfully",
    )))
}

/// All jobs dated exactly on one calendar day, with totals (admin only)
pub async fn daily_summary(
    claims: Claims,
    repo: web::Data<JobRepository>,
    query: web::Query<DailySummaryQuery>,
) -> Result<HttpResponse, AppError> {
    require_admin(&claims)?;

    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let jobs = repo.for_date(date).await?;

    let mut total_amount = BigDecimal::zero();
    for job in &jobs {
        total_amount += &job.amount;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(DailySummary {
        date,
        total_jobs: jobs.len(),
        total_amount,
        jobs,
    })))
}
