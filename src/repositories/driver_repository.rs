use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::driver_dto::{CreateDriverRequest, UpdateDriverRequest};
use crate::models::driver::Driver;
use crate::utils::errors::AppError;

pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        data: &CreateDriverRequest,
        user_id: Uuid,
    ) -> Result<Driver, AppError> {
        let is_registered = data.associated_company.is_some();

        let result = sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (
                driver_name, driver_phone, driver_id_number, license_plate,
                emergency_contact, associated_company, external_company_details,
                truck_number, license_info, is_registered_company_driver, user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&data.driver_name)
        .bind(&data.driver_phone)
        .bind(&data.driver_id_number)
        .bind(data.license_plate.as_deref())
        .bind(data.emergency_contact.as_ref().map(|c| Json(c.clone())))
        .bind(data.associated_company)
        .bind(
            data.external_company_details
                .as_ref()
                .map(|d| Json(d.clone())),
        )
        .bind(data.truck_number.as_deref())
        .bind(data.license_info.as_ref().map(|l| Json(l.clone())))
        .bind(is_registered)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "driverIdNumber"))?;

        Ok(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Driver>, AppError> {
        let result = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    /// Detección de duplicados (teléfono o número de identificación)
    pub async fn find_by_phone_or_id_number(
        &self,
        driver_phone: &str,
        driver_id_number: &str,
    ) -> Result<Option<Driver>, AppError> {
        let result = sqlx::query_as::<_, Driver>(
            "SELECT * FROM drivers WHERE driver_phone = $1 OR driver_id_number = $2",
        )
        .bind(driver_phone)
        .bind(driver_id_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM drivers")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    pub async fn list(&self, page: i64, limit: i64) -> Result<Vec<Driver>, AppError> {
        let result = sqlx::query_as::<_, Driver>(
            "SELECT * FROM drivers ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    /// Conductores asociados a una empresa registrada
    pub async fn find_by_company(&self, company_id: Uuid) -> Result<Vec<Driver>, AppError> {
        let result = sqlx::query_as::<_, Driver>(
            "SELECT * FROM drivers WHERE associated_company = $1 ORDER BY created_at DESC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn update(
        &self,
        id: Uuid,
        updates: &UpdateDriverRequest,
    ) -> Result<Option<Driver>, AppError> {
        let result = sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers
            SET driver_name = COALESCE($2, driver_name),
                driver_phone = COALESCE($3, driver_phone),
                license_plate = COALESCE($4, license_plate),
                emergency_contact = COALESCE($5, emergency_contact),
                external_company_details = COALESCE($6, external_company_details),
                truck_number = COALESCE($7, truck_number),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(updates.driver_name.as_deref())
        .bind(updates.driver_phone.as_deref())
        .bind(updates.license_plate.as_deref())
        .bind(updates.emergency_contact.as_ref().map(|c| Json(c.clone())))
        .bind(
            updates
                .external_company_details
                .as_ref()
                .map(|d| Json(d.clone())),
        )
        .bind(updates.truck_number.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "driverIdNumber"))?;

        Ok(result)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Option<Driver>, AppError> {
        let result = sqlx::query_as::<_, Driver>("DELETE FROM drivers WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }
}
