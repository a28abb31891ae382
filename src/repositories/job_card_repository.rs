use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::job_card::{JobCard, JobCardStatus, RepairLineItem};
use crate::utils::errors::AppError;

pub struct JobCardRepository {
    pool: PgPool,
}

impl JobCardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        truck_id: Uuid,
        description: &[RepairLineItem],
        status: JobCardStatus,
        driver_name: Option<&str>,
        driver_phone: Option<&str>,
        company_id: Option<Uuid>,
    ) -> Result<JobCard, AppError> {
        let result = sqlx::query_as::<_, JobCard>(
            r#"
            INSERT INTO job_cards (truck_id, description, status, driver_name, driver_phone, company_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(truck_id)
        .bind(Json(description.to_vec()))
        .bind(status)
        .bind(driver_name)
        .bind(driver_phone)
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<JobCard>, AppError> {
        let result = sqlx::query_as::<_, JobCard>("SELECT * FROM job_cards WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    pub async fn count(&self, status: Option<JobCardStatus>) -> Result<i64, AppError> {
        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM job_cards WHERE ($1::job_card_status IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Listado paginado con filtro opcional de estado
    pub async fn list(
        &self,
        status: Option<JobCardStatus>,
        page: i64,
        limit: i64,
    ) -> Result<Vec<JobCard>, AppError> {
        let result = sqlx::query_as::<_, JobCard>(
            r#"
            SELECT * FROM job_cards
            WHERE ($1::job_card_status IS NULL OR status = $1)
            ORDER BY entry_date DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn update(
        &self,
        id: Uuid,
        description: Option<&[RepairLineItem]>,
        status: Option<JobCardStatus>,
        completed_date: Option<DateTime<Utc>>,
        driver_name: Option<&str>,
        driver_phone: Option<&str>,
        company_id: Option<Uuid>,
    ) -> Result<Option<JobCard>, AppError> {
        let result = sqlx::query_as::<_, JobCard>(
            r#"
            UPDATE job_cards
            SET description = COALESCE($2, description),
                status = COALESCE($3, status),
                completed_date = COALESCE($4, completed_date),
                driver_name = COALESCE($5, driver_name),
                driver_phone = COALESCE($6, driver_phone),
                company_id = COALESCE($7, company_id),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(description.map(|d| Json(d.to_vec())))
        .bind(status)
        .bind(completed_date)
        .bind(driver_name)
        .bind(driver_phone)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Option<JobCard>, AppError> {
        let result =
            sqlx::query_as::<_, JobCard>("DELETE FROM job_cards WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(result)
    }
}
