use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::truck::{RepairMilestone, Truck, TruckStatus};
use crate::utils::errors::AppError;

pub struct TruckRepository {
    pool: PgPool,
}

impl TruckRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        license_plate: &str,
        brand: &str,
        owner: Uuid,
        company_id: Option<Uuid>,
    ) -> Result<Truck, AppError> {
        let result = sqlx::query_as::<_, Truck>(
            r#"
            INSERT INTO trucks (license_plate, brand, owner, company_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(license_plate)
        .bind(brand)
        .bind(owner)
        .bind(company_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "licensePlate"))?;

        Ok(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Truck>, AppError> {
        let result = sqlx::query_as::<_, Truck>("SELECT * FROM trucks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    pub async fn find_by_license_plate(
        &self,
        license_plate: &str,
    ) -> Result<Option<Truck>, AppError> {
        let result = sqlx::query_as::<_, Truck>("SELECT * FROM trucks WHERE license_plate = $1")
            .bind(license_plate)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM trucks")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    pub async fn list(&self, page: i64, limit: i64) -> Result<Vec<Truck>, AppError> {
        let result = sqlx::query_as::<_, Truck>(
            "SELECT * FROM trucks ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn update(
        &self,
        id: Uuid,
        brand: Option<&str>,
        status: Option<TruckStatus>,
    ) -> Result<Option<Truck>, AppError> {
        let result = sqlx::query_as::<_, Truck>(
            r#"
            UPDATE trucks
            SET brand = COALESCE($2, brand),
                status = COALESCE($3, status),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(brand)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    /// Persistir la lista de hitos junto con el estado (el modelo ya
    /// fuerza `finalized` cuando llega el hito "ready for pick-up")
    pub async fn save_milestones(
        &self,
        id: Uuid,
        milestones: &[RepairMilestone],
        status: TruckStatus,
    ) -> Result<Option<Truck>, AppError> {
        let result = sqlx::query_as::<_, Truck>(
            r#"
            UPDATE trucks
            SET repair_milestones = $2,
                status = $3,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Json(milestones.to_vec()))
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    /// Registrar una nueva job card en el camión: entra al historial y
    /// pasa a ser la job card en curso
    pub async fn attach_job_card(&self, id: Uuid, job_card_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE trucks
            SET repair_history = array_append(repair_history, $2),
                current_job_card_id = $2,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(job_card_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Soltar la job card en curso (al completarla o archivarla)
    pub async fn clear_current_job_card(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE trucks SET current_job_card_id = NULL, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<Option<Truck>, AppError> {
        let result = sqlx::query_as::<_, Truck>("DELETE FROM trucks WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }
}
