use anyhow::Result;
use bigdecimal::BigDecimal;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::WeeklyPayment;

const PAYMENT_COLUMNS: &str = r#"
    id,
    mechanic_id,
    week_start,
    week_end,
    total_amount,
    total_jobs,
    payment_status,
    paid_date,
    notes,
    created_at
"#;

#[derive(Clone)]
pub struct WeeklyPaymentRepository {
    pool: PgPool,
}

impl WeeklyPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_week(
        &self,
        mechanic_id: Uuid,
        week_start: NaiveDate,
        week_end: NaiveDate,
    ) -> Result<Option<WeeklyPayment>> {
        let payment = sqlx::query_as::<_, WeeklyPayment>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM weekly_payments
            WHERE
                mechanic_id = $1
                AND week_start = $2
                AND week_end = $3
            "#
        ))
        .bind(mechanic_id)
        .bind(week_start)
        .bind(week_end)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<WeeklyPayment>> {
        let payment = sqlx::query_as::<_, WeeklyPayment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM weekly_payments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Insert a settlement row. The UNIQUE (mechanic_id, week_start,
    /// week_end) constraint rejects a concurrent duplicate close; callers
    /// see it as a unique-violation error.
    pub async fn create(
        &self,
        mechanic_id: Uuid,
        week_start: NaiveDate,
        week_end: NaiveDate,
        total_amount: &BigDecimal,
        total_jobs: i32,
        notes: Option<&str>,
    ) -> Result<WeeklyPayment> {
        let payment = sqlx::query_as::<_, WeeklyPayment>(&format!(
            r#"
            INSERT INTO
                weekly_payments (
                    mechanic_id,
                    week_start,
                    week_end,
                    total_amount,
                    total_jobs,
                    payment_status,
                    notes,
                    created_at
                )
            VALUES
                ($1, $2, $3, $4, $5, 'pending', $6, $7)
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(mechanic_id)
        .bind(week_start)
        .bind(week_end)
        .bind(total_amount)
        .bind(total_jobs)
        .bind(notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Flip a pending settlement to paid and cascade the week's completed
    /// jobs to paid, both inside one transaction. The cascade is a single
    /// filtered UPDATE so a crash can never leave half the window touched.
    ///
    /// Returns `None` when the row was not pending anymore (lost race).
    pub async fn mark_paid(&self, id: Uuid) -> Result<Option<WeeklyPayment>> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let payment = sqlx::query_as::<_, WeeklyPayment>(&format!(
            r#"
            UPDATE weekly_payments
            SET payment_status = 'paid', paid_date = $1
            WHERE id = $2 AND payment_status = 'pending'
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(now)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(payment) = payment else {
            tx.rollback().await?;
            return Ok(None);
        };

        let cascaded = sqlx::query(
            r#"
            UPDATE jobs
            SET status = 'paid', updated_at = $1
            WHERE
                mechanic_id = $2
                AND job_date BETWEEN $3 AND $4
                AND status = 'completed'
            "#,
        )
        .bind(now)
        .bind(payment.mechanic_id)
        .bind(payment.week_start)
        .bind(payment.week_end)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        log::info!(
            "Settlement {} marked paid, {} jobs cascaded to paid",
            payment.id,
            cascaded
        );

        Ok(Some(payment))
    }

    /// Settlement history, most recent week first.
    pub async fn history(
        &self,
        mechanic_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WeeklyPayment>> {
        let payments = sqlx::query_as::<_, WeeklyPayment>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM weekly_payments
            WHERE mechanic_id = $1
            ORDER BY week_start DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(mechanic_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }
}
