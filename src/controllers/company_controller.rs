//! Controller de empresas
//!
//! Alta, perfil en tres estados (initial → basic → complete) y
//! asociación de conductores y camiones existentes.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::Json as ResponseJson,
    Extension,
};
use uuid::Uuid;

use crate::dto::company_dto::{
    completion_endpoint, AddAssociationsRequest, CompanyProfileResponse, CompleteProfileRequest,
    CreateCompanyRequest, NextSteps, UpdateCompanyRequest,
};
use crate::dto::{ApiResponse, PaginatedResponse, PaginationMeta, PaginationQuery};
use crate::middleware::auth::{ensure_role, AuthenticatedUser};
use crate::models::company::{Company, ProfileStatus};
use crate::models::user::UserRole;
use crate::repositories::{CompanyRepository, DriverRepository, TruckRepository};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation;

/// Guía de pasos siguientes según el estado del perfil
fn next_steps_for(company: &Company) -> Option<NextSteps> {
    if company.profile_status == ProfileStatus::Complete {
        return None;
    }

    let remaining = company.remaining_profile_fields();
    let (required, optional): (Vec<String>, Vec<String>) = remaining
        .into_iter()
        .partition(|field| field != "bankDetails");

    Some(NextSteps {
        required_fields: (!required.is_empty()).then_some(required),
        optional_fields: (!optional.is_empty()).then_some(optional),
        endpoint: completion_endpoint(company.id),
    })
}

/// POST /api/companies
pub async fn create_company(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateCompanyRequest>,
) -> AppResult<(StatusCode, ResponseJson<CompanyProfileResponse>)> {
    ensure_role(
        &auth,
        &[UserRole::Admin, UserRole::Employee],
        "Access denied. Admin or employee role required.",
    )?;

    let mut errors = Vec::new();
    if payload.company_name.trim().is_empty() {
        errors.push("Company name is required.".to_string());
    }
    if validation::validate_email(&payload.contact_email).is_err() {
        errors.push("A valid contact email is required.".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::ValidationList(errors));
    }

    let repo = CompanyRepository::new(state.pool.clone());

    // Duplicados por nombre o email como lista de conflictos
    if let Some(existing) = repo
        .find_by_name_or_email(&payload.company_name, &payload.contact_email)
        .await?
    {
        let mut conflicts = Vec::new();
        if existing.company_name == payload.company_name {
            conflicts.push("companyName".to_string());
        }
        if existing.contact_email == payload.contact_email {
            conflicts.push("contactEmail".to_string());
        }
        return Err(AppError::Conflict(conflicts));
    }

    let company = repo
        .create(&payload.company_name, &payload.contact_email)
        .await?;

    log::info!("🏢 Empresa creada: {} ({})", company.company_name, company.id);

    let next_steps = next_steps_for(&company);
    Ok((
        StatusCode::CREATED,
        ResponseJson(CompanyProfileResponse {
            success: true,
            message: "Company created successfully. Please complete the company profile."
                .to_string(),
            company,
            next_steps,
        }),
    ))
}

/// GET /api/companies
pub async fn get_companies(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<ResponseJson<PaginatedResponse<Company>>> {
    ensure_role(
        &auth,
        &[UserRole::Admin, UserRole::Employee],
        "Access denied. Admin or employee role required.",
    )?;

    let (page, limit) = pagination.resolve();
    validation::validate_pagination(page, limit)?;

    let repo = CompanyRepository::new(state.pool.clone());
    let total = repo.count().await?;
    let companies = repo.list(page, limit).await?;

    Ok(ResponseJson(PaginatedResponse {
        success: true,
        metadata: PaginationMeta::new(total, page, limit),
        data: companies,
    }))
}

/// GET /api/companies/:id
pub async fn get_company_by_id(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<ResponseJson<ApiResponse<Company>>> {
    // El rol company solo puede consultar su propia empresa
    match auth.role {
        UserRole::Admin | UserRole::Employee => {}
        UserRole::Company if auth.company_id == Some(id) => {}
        _ => {
            return Err(AppError::Forbidden(
                "Access denied. You can only view your own company.".to_string(),
            ))
        }
    }

    let repo = CompanyRepository::new(state.pool.clone());
    let company = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found_error("Company"))?;

    Ok(ResponseJson(ApiResponse::success(company)))
}

/// PUT /api/companies/:id/complete-profile
pub async fn complete_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompleteProfileRequest>,
) -> AppResult<ResponseJson<CompanyProfileResponse>> {
    ensure_role(
        &auth,
        &[UserRole::Admin, UserRole::Employee, UserRole::Company],
        "Access denied.",
    )?;
    if auth.role == UserRole::Company && auth.company_id != Some(id) {
        return Err(AppError::Forbidden(
            "Access denied. You can only update your own company.".to_string(),
        ));
    }

    // Licencia y propietario son obligatorios; el banco es opcional
    // (sin banco el perfil se queda en basic)
    let mut errors = Vec::new();
    if payload
        .license_details
        .as_ref()
        .map_or(true, |d| d.is_empty())
    {
        errors.push("License details are required.".to_string());
    }
    if payload.owner_details.as_ref().map_or(true, |d| d.is_empty()) {
        errors.push("Owner details are required.".to_string());
    }
    if let Some(ref banks) = payload.bank_details {
        for bank in banks {
            if validation::validate_iban(&bank.iban).is_err() {
                errors.push(format!("Invalid IBAN: {}.", bank.iban));
            }
            if validation::validate_swift_code(&bank.swift_code).is_err() {
                errors.push(format!("Invalid SWIFT code: {}.", bank.swift_code));
            }
        }
    }
    if !errors.is_empty() {
        return Err(AppError::ValidationList(errors));
    }

    let repo = CompanyRepository::new(state.pool.clone());
    let company = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found_error("Company"))?;

    // El estado se deriva siempre de los detalles resultantes
    let has_bank = payload
        .bank_details
        .as_ref()
        .map_or(!company.bank_details.0.is_empty(), |d| !d.is_empty());
    let has_license = payload
        .license_details
        .as_ref()
        .map_or(!company.license_details.0.is_empty(), |d| !d.is_empty());
    let has_owner = payload
        .owner_details
        .as_ref()
        .map_or(!company.owner_details.0.is_empty(), |d| !d.is_empty());

    let profile_status = ProfileStatus::derive(has_bank, has_license, has_owner);

    let company = repo
        .update_profile(
            id,
            payload.bank_details.as_deref(),
            payload.license_details.as_deref(),
            payload.owner_details.as_deref(),
            profile_status,
        )
        .await?
        .ok_or_else(|| not_found_error("Company"))?;

    log::info!(
        "🏢 Perfil de empresa {} actualizado a {:?}",
        company.id,
        company.profile_status
    );

    let message = match company.profile_status {
        ProfileStatus::Complete => "Company profile is now complete.".to_string(),
        ProfileStatus::Basic => {
            "Company profile updated to basic. Add bank details to complete it.".to_string()
        }
        ProfileStatus::Initial => {
            "Company profile updated. License and owner details are still required.".to_string()
        }
    };

    let next_steps = next_steps_for(&company);
    Ok(ResponseJson(CompanyProfileResponse {
        success: true,
        message,
        company,
        next_steps,
    }))
}

/// PUT /api/companies/:id/add-associations
pub async fn add_associations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddAssociationsRequest>,
) -> AppResult<ResponseJson<ApiResponse<Company>>> {
    ensure_role(
        &auth,
        &[UserRole::Admin, UserRole::Employee, UserRole::Company],
        "Access denied.",
    )?;
    if auth.role == UserRole::Company && auth.company_id != Some(id) {
        return Err(AppError::Forbidden(
            "Access denied. You can only update your own company.".to_string(),
        ));
    }

    let drivers = payload.drivers.unwrap_or_default();
    let trucks = payload.associated_trucks.unwrap_or_default();
    if drivers.is_empty() && trucks.is_empty() {
        return Err(AppError::BadRequest(
            "At least one driver or truck must be provided.".to_string(),
        ));
    }

    // Verificar que todas las referencias existen antes de asociar
    let driver_repo = DriverRepository::new(state.pool.clone());
    for driver_id in &drivers {
        if driver_repo.find_by_id(*driver_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Driver {} not found.", driver_id)));
        }
    }
    let truck_repo = TruckRepository::new(state.pool.clone());
    for truck_id in &trucks {
        if truck_repo.find_by_id(*truck_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Truck {} not found.", truck_id)));
        }
    }

    let repo = CompanyRepository::new(state.pool.clone());
    let company = repo
        .push_associations(id, &drivers, &trucks)
        .await?
        .ok_or_else(|| not_found_error("Company"))?;

    log::info!(
        "🔗 Asociaciones añadidas a {}: {} conductores, {} camiones",
        company.id,
        drivers.len(),
        trucks.len()
    );

    Ok(ResponseJson(ApiResponse::success_with_message(
        company,
        "Associations added successfully.".to_string(),
    )))
}

/// PUT /api/companies/:id
pub async fn update_company(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCompanyRequest>,
) -> AppResult<ResponseJson<ApiResponse<Company>>> {
    ensure_role(&auth, &[UserRole::Admin], "Access denied. Admin role required.")?;

    if let Some(ref email) = payload.contact_email {
        if validation::validate_email(email).is_err() {
            return Err(AppError::BadRequest(
                "A valid contact email is required.".to_string(),
            ));
        }
    }

    let repo = CompanyRepository::new(state.pool.clone());
    let company = repo
        .update(
            id,
            payload.company_name.as_deref(),
            payload.contact_email.as_deref(),
        )
        .await?
        .ok_or_else(|| not_found_error("Company"))?;

    Ok(ResponseJson(ApiResponse::success_with_message(
        company,
        "Company updated successfully.".to_string(),
    )))
}

/// DELETE /api/companies/:id
pub async fn delete_company(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<ResponseJson<ApiResponse<()>>> {
    ensure_role(&auth, &[UserRole::Admin], "Access denied. Admin role required.")?;

    let repo = CompanyRepository::new(state.pool.clone());
    let company = repo.delete(id).await?.ok_or_else(|| not_found_error("Company"))?;

    // No hay borrado en cascada: las referencias vivas solo se registran
    if !company.drivers.is_empty() || !company.associated_trucks.is_empty() {
        log::warn!(
            "🗑️ Empresa {} eliminada con referencias vivas ({} conductores, {} camiones)",
            company.id,
            company.drivers.len(),
            company.associated_trucks.len()
        );
    }

    Ok(ResponseJson(ApiResponse::message_only(
        "Company deleted successfully.".to_string(),
    )))
}
