use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{
    CreateMechanicRequest, Mechanic, MechanicStats, MechanicStatus, UpdateMechanicRequest,
};

const MECHANIC_COLUMNS: &str = r#"
    id,
    username,
    email,
    password_hash,
    full_name,
    phone,
    specialty,
    hire_date,
    status,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct MechanicRepository {
    pool: PgPool,
}

impl MechanicRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        input: &CreateMechanicRequest,
        password_hash: &str,
    ) -> Result<Mechanic> {
        let now = Utc::now();

        let mechanic = sqlx::query_as::<_, Mechanic>(&format!(
            r#"
            INSERT INTO
                mechanics (
                    username,
                    email,
                    password_hash,
                    full_name,
                    phone,
                    specialty,
                    hire_date,
                    status,
                    created_at,
                    updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {MECHANIC_COLUMNS}
            "#
        ))
        .bind(&input.username)
        .bind(&input.email)
        .bind(password_hash)
        .bind(&input.full_name)
        .bind(&input.phone)
        .bind(&input.specialty)
        .bind(input.hire_date)
        .bind(MechanicStatus::Active)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(mechanic)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Mechanic>> {
        let mechanic = sqlx::query_as::<_, Mechanic>(&format!(
            "SELECT {MECHANIC_COLUMNS} FROM mechanics WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(mechanic)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Mechanic>> {
        let mechanic = sqlx::query_as::<_, Mechanic>(&format!(
            "SELECT {MECHANIC_COLUMNS} FROM mechanics WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(mechanic)
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM mechanics WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    /// Check whether an email is taken, optionally ignoring one mechanic
    /// (so updates do not collide with the row being updated).
    pub async fn email_in_use(&self, email: &str, exclude: Option<Uuid>) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM mechanics
                WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    pub async fn list(&self, status: Option<MechanicStatus>) -> Result<Vec<Mechanic>> {
        let mechanics = sqlx::query_as::<_, Mechanic>(&format!(
            r#"
            SELECT {MECHANIC_COLUMNS}
            FROM mechanics
            WHERE ($1::varchar IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#
        ))
        .bind(status.map(|s| s.to_string()))
        .fetch_all(&self.pool)
        .await?;

        Ok(mechanics)
    }

    /// Partial update; absent fields keep their current value.
    pub async fn update(
        &self,
        id: Uuid,
        input: &UpdateMechanicRequest,
    ) -> Result<Option<Mechanic>> {
        let mechanic = sqlx::query_as::<_, Mechanic>(&format!(
            r#"
            UPDATE mechanics
            SET
                email = COALESCE($1, email),
                full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                specialty = COALESCE($4, specialty),
                status = COALESCE($5, status),
                updated_at = $6
            WHERE
                id = $7
            RETURNING {MECHANIC_COLUMNS}
            "#
        ))
        .bind(&input.email)
        .bind(&input.full_name)
        .bind(&input.phone)
        .bind(&input.specialty)
        .bind(input.status.map(|s| s.to_string()))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(mechanic)
    }

    pub async fn has_jobs(&self, id: Uuid) -> Result<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM jobs WHERE mechanic_id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM mechanics WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn stats(&self, id: Uuid) -> Result<MechanicStats> {
        let stats = sqlx::query_as::<_, MechanicStats>(
            r#"
            SELECT
                COUNT(*) AS total_jobs,
                COALESCE(SUM(amount), 0) AS total_amount,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending_jobs,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_jobs,
                COUNT(*) FILTER (WHERE status = 'paid') AS paid_jobs
            FROM
                jobs
            WHERE
                mechanic_id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE mechanics SET password_hash = $1, updated_at = $2 WHERE id = $3")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
