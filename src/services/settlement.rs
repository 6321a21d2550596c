use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::database::models::{Job, JobStatus, PaymentStatus, WeeklyPayment};
use crate::database::repositories::{JobRepository, MechanicRepository, WeeklyPaymentRepository};
use crate::error::AppError;
use crate::services::week::week_bounds;

/// Sum and count of the jobs a settlement covers: completed or already
/// paid, pending work is excluded.
pub fn settlement_totals(jobs: &[Job]) -> (BigDecimal, i32) {
    let mut total_amount = BigDecimal::zero();
    let mut total_jobs = 0;

    for job in jobs {
        if matches!(job.status, JobStatus::Completed | JobStatus::Paid) {
            total_amount += &job.amount;
            total_jobs += 1;
        }
    }

    (total_amount, total_jobs)
}

/// A week with an existing settlement record cannot be closed again,
/// whatever state that record is in.
pub fn ensure_week_open(existing: Option<&WeeklyPayment>) -> Result<(), AppError> {
    if existing.is_some() {
        return Err(AppError::Conflict(
            "A payment record already exists for this week".to_string(),
        ));
    }
    Ok(())
}

/// Paid is terminal: only a pending settlement may be marked paid.
pub fn ensure_pending(payment: &WeeklyPayment) -> Result<(), AppError> {
    if payment.payment_status == PaymentStatus::Paid {
        return Err(AppError::InvalidState(
            "Payment is already marked as paid".to_string(),
        ));
    }
    Ok(())
}

/// Owns the `(mechanic, week)` settlement state machine:
/// absent -> pending -> paid, with paid terminal.
#[derive(Clone)]
pub struct SettlementService {
    mechanic_repository: MechanicRepository,
    job_repository: JobRepository,
    payment_repository: WeeklyPaymentRepository,
}

impl SettlementService {
    pub fn new(
        mechanic_repository: MechanicRepository,
        job_repository: JobRepository,
        payment_repository: WeeklyPaymentRepository,
    ) -> Self {
        Self {
            mechanic_repository,
            job_repository,
            payment_repository,
        }
    }

    /// Close the week containing `date` for one mechanic, freezing its
    /// totals into a settlement record.
    ///
    /// Totals are a snapshot: jobs entered into this window after the close
    /// are not counted, so closing before the week is fully entered
    /// under-counts it permanently. That tradeoff keeps settled weeks
    /// stable as historical payment records.
    pub async fn close_week(
        &self,
        mechanic_id: Uuid,
        date: Option<NaiveDate>,
        notes: Option<&str>,
    ) -> Result<WeeklyPayment, AppError> {
        self.mechanic_repository
            .find_by_id(mechanic_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Mechanic not found".to_string()))?;

        let (week_start, week_end) = week_bounds(date);

        // Fast-path duplicate check; the UNIQUE constraint on the insert
        // below is what actually breaks concurrent-close races.
        let existing = self
            .payment_repository
            .find_by_week(mechanic_id, week_start, week_end)
            .await?;
        ensure_week_open(existing.as_ref())?;

        let jobs = self
            .job_repository
            .for_mechanic_in_window(mechanic_id, week_start, week_end)
            .await?;
        let (total_amount, total_jobs) = settlement_totals(&jobs);

        let payment = self
            .payment_repository
            .create(
                mechanic_id,
                week_start,
                week_end,
                &total_amount,
                total_jobs,
                notes,
            )
            .await
            .map_err(|err| match AppError::from(err) {
                AppError::Conflict(_) => AppError::Conflict(
                    "A payment record already exists for this week".to_string(),
                ),
                other => other,
            })?;

        log::info!(
            "Closed week {}..{} for mechanic {}: {} jobs, total {}",
            week_start,
            week_end,
            mechanic_id,
            total_jobs,
            total_amount
        );

        Ok(payment)
    }

    /// Mark a settlement as paid and cascade the window's completed jobs to
    /// paid. Re-marking an already-paid settlement is rejected, not
    /// silently ignored.
    pub async fn mark_paid(&self, payment_id: Uuid) -> Result<WeeklyPayment, AppError> {
        let existing = self
            .payment_repository
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment record not found".to_string()))?;

        ensure_pending(&existing)?;

        // The repository re-checks pending status inside the transaction,
        // so a concurrent caller losing the race lands here too.
        self.payment_repository
            .mark_paid(payment_id)
            .await?
            .ok_or_else(|| {
                AppError::InvalidState("Payment is already marked as paid".to_string())
            })
    }

    pub async fn history(
        &self,
        mechanic_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WeeklyPayment>, AppError> {
        let payments = self
            .payment_repository
            .history(mechanic_id, limit, offset)
            .await?;

        Ok(payments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn job(amount: &str, day: u32, status: JobStatus) -> Job {
        let now = Utc::now();
        Job {
            id: Uuid::new_v4(),
            mechanic_id: Uuid::new_v4(),
            description: "brake pads".to_string(),
            amount: BigDecimal::from_str(amount).unwrap(),
            job_date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            status,
            vehicle_info: None,
            notes: None,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn totals_cover_completed_and_paid_but_not_pending() {
        // Mon $50 completed, Tue $30 pending, Wed $20 paid
        let jobs = vec![
            job("50.00", 2, JobStatus::Completed),
            job("30.00", 3, JobStatus::Pending),
            job("20.00", 4, JobStatus::Paid),
        ];

        let (total_amount, total_jobs) = settlement_totals(&jobs);
        assert_eq!(total_amount, BigDecimal::from_str("70.00").unwrap());
        assert_eq!(total_jobs, 2);
    }

    #[test]
    fn totals_of_an_empty_week_are_zero() {
        let (total_amount, total_jobs) = settlement_totals(&[]);
        assert_eq!(total_amount, BigDecimal::zero());
        assert_eq!(total_jobs, 0);
    }

    fn payment(status: PaymentStatus) -> WeeklyPayment {
        WeeklyPayment {
            id: Uuid::new_v4(),
            mechanic_id: Uuid::new_v4(),
            week_start: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            week_end: NaiveDate::from_ymd_opt(2025, 6, 8).unwrap(),
            total_amount: BigDecimal::from_str("70.00").unwrap(),
            total_jobs: 2,
            payment_status: status,
            paid_date: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn closing_an_already_closed_week_is_a_conflict() {
        assert!(ensure_week_open(None).is_ok());

        let pending = payment(PaymentStatus::Pending);
        assert!(matches!(
            ensure_week_open(Some(&pending)),
            Err(AppError::Conflict(_))
        ));

        // A paid-out record blocks a re-close just the same
        let paid = payment(PaymentStatus::Paid);
        assert!(matches!(
            ensure_week_open(Some(&paid)),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn marking_a_paid_settlement_paid_again_is_invalid_state() {
        let pending = payment(PaymentStatus::Pending);
        assert!(ensure_pending(&pending).is_ok());

        // The second mark-paid is rejected before any job cascade runs
        let paid = payment(PaymentStatus::Paid);
        assert!(matches!(
            ensure_pending(&paid),
            Err(AppError::InvalidState(_))
        ));
    }

    #[test]
    fn totals_keep_decimal_precision() {
        let jobs = vec![
            job("19.99", 2, JobStatus::Completed),
            job("0.01", 3, JobStatus::Completed),
        ];

        let (total_amount, total_jobs) = settlement_totals(&jobs);
        assert_eq!(total_amount, BigDecimal::from_str("20.00").unwrap());
        assert_eq!(total_jobs, 2);
    }
}
