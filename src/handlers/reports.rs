use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{require_admin, require_self_or_admin, Claims};
use crate::database::models::CloseWeekRequest;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{ReportService, SettlementService};

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    /// Any date inside the week of interest; defaults to today.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Weekly rollup across all mechanics (any authenticated caller)
pub async fn weekly_summary(
    _claims: Claims,
    reports: web::Data<ReportService>,
    query: web::Query<WeekQuery>,
) -> Result<HttpResponse, AppError> {
    let summary = reports.weekly_summary_all(query.date).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}

/// Weekly rollup for one mechanic (self or admin)
pub async fn mechanic_weekly_summary(
    claims: Claims,
    reports: web::Data<ReportService>,
    path: web::Path<Uuid>,
    query: web::Query<WeekQuery>,
) -> Result<HttpResponse, AppError> {
    let mechanic_id = path.into_inner();
    require_self_or_admin(&claims, mechanic_id)?;

    let summary = reports
        .weekly_summary_for_mechanic(mechanic_id, query.date)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}

/// Close a mechanic's week into a settlement record (admin only).
///
/// Totals are frozen at close time: jobs entered into the window afterwards
/// are not added retroactively, so close only once the week is fully
/// entered.
pub async fn close_week(
    claims: Claims,
    settlements: web::Data<SettlementService>,
    path: web::Path<Uuid>,
    input: web::Json<CloseWeekRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&claims)?;

    let payment = settlements
        .close_week(path.into_inner(), input.date, input.notes.as_deref())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        Some(payment),
        "Week closed successfully",
    )))
}

/// Settlement history for a mechanic, most recent week first (self or admin)
pub async fn payment_history(
    claims: Claims,
    settlements: web::Data<SettlementService>,
    path: web::Path<Uuid>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, AppError> {
    let mechanic_id = path.into_inner();
    require_self_or_admin(&claims, mechanic_id)?;

    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let offset = query.offset.unwrap_or(0).max(0);

    let payments = settlements.history(mechanic_id, limit, offset).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(payments)))
}

/// Mark a settlement paid and cascade its completed jobs to paid (admin
/// only)
pub async fn mark_paid(
    claims: Claims,
    settlements: web::Data<SettlementService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    require_admin(&claims)?;

    let payment = settlements.mark_paid(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(payment),
        "Payment marked as paid",
    )))
}
