use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::user_dto::UpdateUserRequest;
use crate::models::user::User;
use crate::utils::errors::AppError;

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let result = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let result = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    /// Buscar por email o teléfono (para detección de duplicados y reset)
    pub async fn find_by_email_or_phone(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        let result = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = $1 OR ($2::text IS NOT NULL AND phone = $2)",
        )
        .bind(email)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    pub async fn list(&self, page: i64, limit: i64) -> Result<Vec<User>, AppError> {
        let result = sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    /// Actualización a nivel de campo; los campos sensibles no llegan
    /// hasta aquí (no existen en el DTO)
    pub async fn update(
        &self,
        id: Uuid,
        updates: &UpdateUserRequest,
    ) -> Result<Option<User>, AppError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                license_plate = COALESCE($5, license_plate),
                is_active = COALESCE($6, is_active),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(updates.name.as_deref())
        .bind(updates.email.as_deref())
        .bind(updates.phone.as_deref())
        .bind(updates.license_plate.as_deref())
        .bind(updates.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "email"))?;

        Ok(result)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let result = sqlx::query_as::<_, User>("DELETE FROM users WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    pub async fn set_reset_code(
        &self,
        id: Uuid,
        reset_code: &str,
        expires: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users SET reset_code = $2, reset_code_expires = $3, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(reset_code)
        .bind(expires)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Cambiar la contraseña y limpiar el código de reset en un solo paso
    pub async fn reset_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, reset_code = NULL, reset_code_expires = NULL,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Quitar un camión de la lista de camiones asociados del usuario
    pub async fn pull_associated_truck(
        &self,
        user_id: Uuid,
        truck_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users SET associated_trucks = array_remove(associated_trucks, $2), updated_at = now() WHERE id = $1",
        )
        .bind(user_id)
        .bind(truck_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Añadir un camión a la lista de camiones asociados del usuario
    pub async fn push_associated_truck(
        &self,
        user_id: Uuid,
        truck_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users SET associated_trucks = array_append(associated_trucks, $2), updated_at = now() WHERE id = $1",
        )
        .bind(user_id)
        .bind(truck_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
