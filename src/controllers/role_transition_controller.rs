//! Controller de transición de rol
//!
//! Un usuario general pasa a company, company_driver, unregistered_driver
//! o truck_owner. La validación del payload ocurre antes de abrir la
//! transacción; toda la creación de entidades y la actualización del
//! usuario ocurren dentro de una única transacción, de modo que una
//! transición nunca queda a medias.

use axum::{
    extract::{Json, State},
    response::Json as ResponseJson,
    Extension,
};
use sqlx::types::Json as SqlxJson;

use crate::dto::role_transition_dto::{
    RoleTransition, RoleTransitionRequest, RoleTransitionResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::company::Company;
use crate::models::truck::Truck;
use crate::models::user::User;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// POST /api/role-transition
pub async fn transition_role(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<RoleTransitionRequest>,
) -> AppResult<ResponseJson<RoleTransitionResponse>> {
    // El payload malformado nunca llega a la transacción
    let transition = payload.validate().map_err(AppError::ValidationList)?;

    let mut tx = state.pool.begin().await?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
        .bind(auth.user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| not_found_error("User"))?;

    let (user, company, message, needs_profile_completion) = match transition {
        RoleTransition::Company { company_name } => {
            // Sin nombre explícito, la empresa hereda el del usuario
            let company_name = company_name.unwrap_or_else(|| {
                let base = user
                    .name
                    .clone()
                    .unwrap_or_else(|| user.email.split('@').next().unwrap_or("").to_string());
                format!("{}'s Company", base)
            });

            let company = sqlx::query_as::<_, Company>(
                r#"
                INSERT INTO companies (company_name, contact_email)
                VALUES ($1, $2)
                RETURNING *
                "#,
            )
            .bind(&company_name)
            .bind(&user.email)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::from_unique_violation(e, "contactEmail"))?;

            // Reclamo condicional: si el usuario ya tiene empresa, 0 filas
            // y la transacción entera se revierte (la empresa incluida)
            let updated = sqlx::query_as::<_, User>(
                r#"
                UPDATE users
                SET role = 'company', company_id = $2, updated_at = now()
                WHERE id = $1 AND company_id IS NULL
                RETURNING *
                "#,
            )
            .bind(user.id)
            .bind(company.id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest("User is already linked to a company.".to_string())
            })?;

            (
                updated,
                Some(company),
                "Role updated to company. Please complete your company profile.".to_string(),
                Some(true),
            )
        }

        RoleTransition::CompanyDriver {
            company_id,
            driver_info,
        } => {
            // Empresa inexistente: error recuperable con la alternativa
            // de registrarse como unregistered_driver
            let company = sqlx::query_as::<_, Company>(
                "SELECT * FROM companies WHERE id = $1 FOR UPDATE",
            )
            .bind(company_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::RecoverableCompanyNotFound)?;

            let driver_id: (uuid::Uuid,) = sqlx::query_as(
                r#"
                INSERT INTO drivers (
                    driver_name, driver_phone, driver_id_number, license_plate,
                    associated_company, is_registered_company_driver, user_id
                )
                VALUES ($1, $2, $3, $4, $5, TRUE, $6)
                RETURNING id
                "#,
            )
            .bind(&driver_info.name)
            .bind(&driver_info.phone_number)
            .bind(driver_info.id_number.as_deref())
            .bind(driver_info.license_plate.as_deref())
            .bind(company.id)
            .bind(user.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::from_unique_violation(e, "driverIdNumber"))?;

            sqlx::query(
                "UPDATE companies SET drivers = array_append(drivers, $2), updated_at = now() WHERE id = $1",
            )
            .bind(company.id)
            .bind(driver_id.0)
            .execute(&mut *tx)
            .await?;

            let updated = sqlx::query_as::<_, User>(
                r#"
                UPDATE users
                SET role = 'company_driver', company_id = $2, driver_info = $3,
                    updated_at = now()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(user.id)
            .bind(company.id)
            .bind(SqlxJson(driver_info))
            .fetch_one(&mut *tx)
            .await?;

            (
                updated,
                Some(company),
                "Role updated to company driver successfully.".to_string(),
                None,
            )
        }

        RoleTransition::UnregisteredDriver {
            driver_info,
            company_details,
        } => {
            // También se crea un registro de conductor, marcado como
            // externo. Repetir la transición crea un segundo registro:
            // la operación no es idempotente.
            sqlx::query(
                r#"
                INSERT INTO drivers (
                    driver_name, driver_phone, driver_id_number, license_plate,
                    external_company_details, is_registered_company_driver, user_id
                )
                VALUES ($1, $2, $3, $4, $5, FALSE, $6)
                "#,
            )
            .bind(&driver_info.name)
            .bind(&driver_info.phone_number)
            .bind(driver_info.id_number.as_deref())
            .bind(driver_info.license_plate.as_deref())
            .bind(SqlxJson(company_details.clone()))
            .bind(user.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_unique_violation(e, "driverIdNumber"))?;

            let updated = sqlx::query_as::<_, User>(
                r#"
                UPDATE users
                SET role = 'unregistered_driver', driver_info = $2,
                    company_details = $3, updated_at = now()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(user.id)
            .bind(SqlxJson(driver_info))
            .bind(SqlxJson(company_details))
            .fetch_one(&mut *tx)
            .await?;

            (
                updated,
                None,
                "Role updated to unregistered driver successfully.".to_string(),
                None,
            )
        }

        RoleTransition::TruckOwner {
            license_plate,
            brand,
        } => {
            let truck = sqlx::query_as::<_, Truck>(
                r#"
                INSERT INTO trucks (license_plate, brand, owner)
                VALUES ($1, $2, $3)
                RETURNING *
                "#,
            )
            .bind(&license_plate)
            .bind(&brand)
            .bind(user.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::from_unique_violation(e, "licensePlate"))?;

            let updated = sqlx::query_as::<_, User>(
                r#"
                UPDATE users
                SET role = 'truck_owner', license_plate = $2,
                    associated_trucks = array_append(associated_trucks, $3),
                    updated_at = now()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(user.id)
            .bind(&license_plate)
            .bind(truck.id)
            .fetch_one(&mut *tx)
            .await?;

            (
                updated,
                None,
                "Role updated to truck owner successfully.".to_string(),
                None,
            )
        }
    };

    tx.commit().await?;

    log::info!("🔄 Transición de rol: {} → {:?}", user.email, user.role);

    Ok(ResponseJson(RoleTransitionResponse {
        success: true,
        message,
        user,
        company,
        needs_profile_completion,
    }))
}
