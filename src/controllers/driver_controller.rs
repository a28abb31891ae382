//! Controller de conductores
//!
//! Un conductor pertenece a una empresa registrada (associatedCompany)
//! o trabaja para una empresa externa (externalCompanyDetails),
//! nunca ambas a la vez.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::Json as ResponseJson,
    Extension,
};
use uuid::Uuid;

use crate::dto::driver_dto::{CreateDriverRequest, UpdateDriverRequest};
use crate::dto::{ApiResponse, PaginatedResponse, PaginationMeta, PaginationQuery};
use crate::middleware::auth::{ensure_role, AuthenticatedUser};
use crate::models::driver::Driver;
use crate::models::user::UserRole;
use crate::repositories::{CompanyRepository, DriverRepository};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation;

const WRITE_ROLES: &[UserRole] = &[UserRole::Admin, UserRole::Company];
const READ_ROLES: &[UserRole] = &[UserRole::Admin, UserRole::Company, UserRole::Employee];

/// POST /api/drivers
pub async fn create_driver(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateDriverRequest>,
) -> AppResult<(StatusCode, ResponseJson<ApiResponse<Driver>>)> {
    ensure_role(&auth, WRITE_ROLES, "Access denied. Admin or company role required.")?;

    let mut errors = Vec::new();
    if payload.driver_name.trim().is_empty() {
        errors.push("Driver name is required.".to_string());
    }
    if validation::validate_phone(&payload.driver_phone).is_err() {
        errors.push("Driver phone must be a valid international number.".to_string());
    }
    if payload.driver_id_number.trim().is_empty() {
        errors.push("Driver ID number is required.".to_string());
    }
    if let Some(ref plate) = payload.license_plate {
        if validation::validate_license_plate(plate).is_err() {
            errors.push("License plate must be 2-11 characters (A-Z, 0-9, hyphens).".to_string());
        }
    }
    match (&payload.associated_company, &payload.external_company_details) {
        (Some(_), Some(_)) => errors.push(
            "A driver cannot have both an associated company and external company details."
                .to_string(),
        ),
        (None, None) => errors.push(
            "Either an associated company or external company details are required.".to_string(),
        ),
        _ => {}
    }
    if !errors.is_empty() {
        return Err(AppError::ValidationList(errors));
    }

    // La empresa asociada debe existir
    if let Some(company_id) = payload.associated_company {
        let company_repo = CompanyRepository::new(state.pool.clone());
        if company_repo.find_by_id(company_id).await?.is_none() {
            return Err(not_found_error("Company"));
        }
    }

    let repo = DriverRepository::new(state.pool.clone());

    // Duplicados por teléfono o número de identificación
    if let Some(existing) = repo
        .find_by_phone_or_id_number(&payload.driver_phone, &payload.driver_id_number)
        .await?
    {
        let mut conflicts = Vec::new();
        if existing.driver_phone == payload.driver_phone {
            conflicts.push("driverPhone".to_string());
        }
        if existing.driver_id_number.as_deref() == Some(payload.driver_id_number.as_str()) {
            conflicts.push("driverIdNumber".to_string());
        }
        return Err(AppError::Conflict(conflicts));
    }

    let driver = repo.create(&payload, auth.user_id).await?;

    // Un conductor de empresa registrada entra en la lista de la empresa
    if let Some(company_id) = driver.associated_company {
        let company_repo = CompanyRepository::new(state.pool.clone());
        company_repo
            .push_associations(company_id, &[driver.id], &[])
            .await?;
    }

    log::info!("🚚 Conductor creado: {} ({})", driver.driver_name, driver.id);

    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success_with_message(
        driver,
        "Driver created successfully.".to_string(),
    ))))
}

/// GET /api/drivers
pub async fn get_drivers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<ResponseJson<PaginatedResponse<Driver>>> {
    ensure_role(&auth, READ_ROLES, "Access denied.")?;

    let (page, limit) = pagination.resolve();
    validation::validate_pagination(page, limit)?;

    let repo = DriverRepository::new(state.pool.clone());
    let total = repo.count().await?;
    let drivers = repo.list(page, limit).await?;

    Ok(ResponseJson(PaginatedResponse {
        success: true,
        metadata: PaginationMeta::new(total, page, limit),
        data: drivers,
    }))
}

/// GET /api/drivers/:id
pub async fn get_driver_by_id(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<ResponseJson<ApiResponse<Driver>>> {
    ensure_role(&auth, READ_ROLES, "Access denied.")?;

    let repo = DriverRepository::new(state.pool.clone());
    let driver = repo.find_by_id(id).await?.ok_or_else(|| not_found_error("Driver"))?;

    Ok(ResponseJson(ApiResponse::success(driver)))
}

/// GET /api/drivers/company/:companyId
pub async fn get_company_drivers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(company_id): Path<Uuid>,
) -> AppResult<ResponseJson<ApiResponse<Vec<Driver>>>> {
    ensure_role(&auth, READ_ROLES, "Access denied.")?;

    let company_repo = CompanyRepository::new(state.pool.clone());
    if company_repo.find_by_id(company_id).await?.is_none() {
        return Err(not_found_error("Company"));
    }

    let repo = DriverRepository::new(state.pool.clone());
    let drivers = repo.find_by_company(company_id).await?;

    Ok(ResponseJson(ApiResponse::success(drivers)))
}

/// PUT /api/drivers/:id
pub async fn update_driver(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDriverRequest>,
) -> AppResult<ResponseJson<ApiResponse<Driver>>> {
    ensure_role(&auth, WRITE_ROLES, "Access denied. Admin or company role required.")?;

    if let Some(ref phone) = payload.driver_phone {
        if validation::validate_phone(phone).is_err() {
            return Err(AppError::BadRequest(
                "Driver phone must be a valid international number.".to_string(),
            ));
        }
    }

    let repo = DriverRepository::new(state.pool.clone());

    // El rol company solo puede tocar sus propios conductores
    if auth.role == UserRole::Company {
        let driver = repo.find_by_id(id).await?.ok_or_else(|| not_found_error("Driver"))?;
        if driver.associated_company != auth.company_id {
            return Err(AppError::Forbidden(
                "Access denied. You can only update your own drivers.".to_string(),
            ));
        }
    }

    let driver = repo
        .update(id, &payload)
        .await?
        .ok_or_else(|| not_found_error("Driver"))?;

    Ok(ResponseJson(ApiResponse::success_with_message(
        driver,
        "Driver updated successfully.".to_string(),
    )))
}

/// DELETE /api/drivers/:id
pub async fn delete_driver(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<ResponseJson<ApiResponse<()>>> {
    ensure_role(&auth, WRITE_ROLES, "Access denied. Admin or company role required.")?;

    let repo = DriverRepository::new(state.pool.clone());

    if auth.role == UserRole::Company {
        let driver = repo.find_by_id(id).await?.ok_or_else(|| not_found_error("Driver"))?;
        if driver.associated_company != auth.company_id {
            return Err(AppError::Forbidden(
                "Access denied. You can only delete your own drivers.".to_string(),
            ));
        }
    }

    let driver = repo.delete(id).await?.ok_or_else(|| not_found_error("Driver"))?;

    // Quitar la referencia directa en la empresa asociada
    if let Some(company_id) = driver.associated_company {
        let company_repo = CompanyRepository::new(state.pool.clone());
        company_repo.pull_driver(company_id, driver.id).await?;
    }

    Ok(ResponseJson(ApiResponse::message_only(
        "Driver deleted successfully.".to_string(),
    )))
}
