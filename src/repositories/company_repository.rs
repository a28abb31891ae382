use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::company::{
    BankDetails, Company, CompanyLicenseDetails, CompanyOwnerDetails, ProfileStatus,
};
use crate::utils::errors::AppError;

pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        company_name: &str,
        contact_email: &str,
    ) -> Result<Company, AppError> {
        let result = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (company_name, contact_email)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(company_name)
        .bind(contact_email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "contactEmail"))?;

        Ok(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let result = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    /// Detección de duplicados al registrar (nombre o email de contacto)
    pub async fn find_by_name_or_email(
        &self,
        company_name: &str,
        contact_email: &str,
    ) -> Result<Option<Company>, AppError> {
        let result = sqlx::query_as::<_, Company>(
            "SELECT * FROM companies WHERE company_name = $1 OR contact_email = $2",
        )
        .bind(company_name)
        .bind(contact_email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM companies")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    pub async fn list(&self, page: i64, limit: i64) -> Result<Vec<Company>, AppError> {
        let result = sqlx::query_as::<_, Company>(
            "SELECT * FROM companies ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    /// Guardar los detalles de perfil y el estado derivado en un solo UPDATE
    pub async fn update_profile(
        &self,
        id: Uuid,
        bank_details: Option<&[BankDetails]>,
        license_details: Option<&[CompanyLicenseDetails]>,
        owner_details: Option<&[CompanyOwnerDetails]>,
        profile_status: ProfileStatus,
    ) -> Result<Option<Company>, AppError> {
        let result = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET bank_details = COALESCE($2, bank_details),
                license_details = COALESCE($3, license_details),
                owner_details = COALESCE($4, owner_details),
                profile_status = $5,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(bank_details.map(|d| Json(d.to_vec())))
        .bind(license_details.map(|d| Json(d.to_vec())))
        .bind(owner_details.map(|d| Json(d.to_vec())))
        .bind(profile_status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn update(
        &self,
        id: Uuid,
        company_name: Option<&str>,
        contact_email: Option<&str>,
    ) -> Result<Option<Company>, AppError> {
        let result = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET company_name = COALESCE($2, company_name),
                contact_email = COALESCE($3, contact_email),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(company_name)
        .bind(contact_email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "contactEmail"))?;

        Ok(result)
    }

    /// Asociar conductores y camiones existentes sin duplicar ids
    pub async fn push_associations(
        &self,
        id: Uuid,
        drivers: &[Uuid],
        associated_trucks: &[Uuid],
    ) -> Result<Option<Company>, AppError> {
        let result = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET drivers = (
                    SELECT ARRAY(SELECT DISTINCT unnest(drivers || $2::uuid[]))
                ),
                associated_trucks = (
                    SELECT ARRAY(SELECT DISTINCT unnest(associated_trucks || $3::uuid[]))
                ),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(drivers)
        .bind(associated_trucks)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn pull_driver(&self, company_id: Uuid, driver_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE companies SET drivers = array_remove(drivers, $2), updated_at = now() WHERE id = $1",
        )
        .bind(company_id)
        .bind(driver_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn pull_truck(&self, company_id: Uuid, truck_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE companies SET associated_trucks = array_remove(associated_trucks, $2), updated_at = now() WHERE id = $1",
        )
        .bind(company_id)
        .bind(truck_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let result =
            sqlx::query_as::<_, Company>("DELETE FROM companies WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(result)
    }
}
