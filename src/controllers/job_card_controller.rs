//! Controller de job cards
//!
//! Unidades de trabajo de reparación sobre un camión. Los campos de
//! conductor y empresa se aportan juntos o no se aportan.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::Json as ResponseJson,
    Extension,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::dto::job_card_dto::{CreateJobCardRequest, JobCardListQuery, UpdateJobCardRequest};
use crate::dto::{ApiResponse, PaginatedResponse, PaginationMeta};
use crate::middleware::auth::{ensure_role, AuthenticatedUser};
use crate::models::job_card::{validate_driver_company_rule, JobCard, JobCardStatus, RepairLineItem};
use crate::models::user::UserRole;
use crate::repositories::{CompanyRepository, JobCardRepository, TruckRepository};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation;

const STAFF_ROLES: &[UserRole] = &[UserRole::Admin, UserRole::Employee];

/// Validar las líneas de reparación: nombre presente y costes no negativos
fn validate_line_items(items: &[RepairLineItem]) -> Result<(), AppError> {
    let mut errors = Vec::new();
    if items.is_empty() {
        errors.push("At least one repair line item is required.".to_string());
    }
    for item in items {
        if item.part_name.trim().is_empty() {
            errors.push("Part name is required for every line item.".to_string());
        }
        if item.part_cost < Decimal::ZERO {
            errors.push(format!("Part cost for {} cannot be negative.", item.part_name));
        }
        if item.repair_fee < Decimal::ZERO {
            errors.push(format!("Repair fee for {} cannot be negative.", item.part_name));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationList(errors))
    }
}

/// POST /api/jobcard
pub async fn create_job_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateJobCardRequest>,
) -> AppResult<(StatusCode, ResponseJson<ApiResponse<JobCard>>)> {
    ensure_role(&auth, STAFF_ROLES, "Access denied. Admin or employee role required.")?;

    validate_line_items(&payload.description)?;
    validate_driver_company_rule(
        &payload.driver_name,
        &payload.driver_phone,
        &payload.company_id,
    )
    .map_err(AppError::BadRequest)?;

    let truck_repo = TruckRepository::new(state.pool.clone());
    if truck_repo.find_by_id(payload.truck_id).await?.is_none() {
        return Err(not_found_error("Truck"));
    }

    if let Some(company_id) = payload.company_id {
        let company_repo = CompanyRepository::new(state.pool.clone());
        if company_repo.find_by_id(company_id).await?.is_none() {
            return Err(not_found_error("Company"));
        }
    }

    let repo = JobCardRepository::new(state.pool.clone());
    let job_card = repo
        .create(
            payload.truck_id,
            &payload.description,
            payload.status.unwrap_or(JobCardStatus::InProgress),
            payload.driver_name.as_deref(),
            payload.driver_phone.as_deref(),
            payload.company_id,
        )
        .await?;

    // El camión guarda la job card en curso y en su historial
    truck_repo.attach_job_card(job_card.truck_id, job_card.id).await?;

    log::info!("📋 Job card creada: {} (camión {})", job_card.id, job_card.truck_id);

    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success_with_message(
        job_card,
        "Job card created successfully.".to_string(),
    ))))
}

/// GET /api/jobcard
pub async fn get_job_cards(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<JobCardListQuery>,
) -> AppResult<ResponseJson<PaginatedResponse<JobCard>>> {
    ensure_role(&auth, STAFF_ROLES, "Access denied. Admin or employee role required.")?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);
    validation::validate_pagination(page, limit)?;

    let repo = JobCardRepository::new(state.pool.clone());
    let total = repo.count(query.status).await?;
    let job_cards = repo.list(query.status, page, limit).await?;

    Ok(ResponseJson(PaginatedResponse {
        success: true,
        metadata: PaginationMeta::new(total, page, limit),
        data: job_cards,
    }))
}

/// GET /api/jobcard/:id
pub async fn get_job_card_by_id(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<ResponseJson<ApiResponse<JobCard>>> {
    ensure_role(&auth, STAFF_ROLES, "Access denied. Admin or employee role required.")?;

    let repo = JobCardRepository::new(state.pool.clone());
    let job_card = repo.find_by_id(id).await?.ok_or_else(|| not_found_error("Job card"))?;

    Ok(ResponseJson(ApiResponse::success(job_card)))
}

/// PUT /api/jobcard/:id
pub async fn update_job_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobCardRequest>,
) -> AppResult<ResponseJson<ApiResponse<JobCard>>> {
    ensure_role(&auth, STAFF_ROLES, "Access denied. Admin or employee role required.")?;

    if let Some(ref items) = payload.description {
        validate_line_items(items)?;
    }

    let repo = JobCardRepository::new(state.pool.clone());
    let existing = repo.find_by_id(id).await?.ok_or_else(|| not_found_error("Job card"))?;

    // La regla todos-o-ninguno se evalúa sobre el estado resultante
    let merged_name = payload.driver_name.clone().or(existing.driver_name.clone());
    let merged_phone = payload.driver_phone.clone().or(existing.driver_phone.clone());
    let merged_company = payload.company_id.or(existing.company_id);
    validate_driver_company_rule(&merged_name, &merged_phone, &merged_company)
        .map_err(AppError::BadRequest)?;

    // Completar la job card sella la fecha y libera el camión
    let becoming_completed = payload.status == Some(JobCardStatus::Completed)
        && existing.status != JobCardStatus::Completed;
    let completed_date = becoming_completed.then(chrono::Utc::now);

    let job_card = repo
        .update(
            id,
            payload.description.as_deref(),
            payload.status,
            completed_date,
            payload.driver_name.as_deref(),
            payload.driver_phone.as_deref(),
            payload.company_id,
        )
        .await?
        .ok_or_else(|| not_found_error("Job card"))?;

    if becoming_completed {
        let truck_repo = TruckRepository::new(state.pool.clone());
        truck_repo.clear_current_job_card(job_card.truck_id).await?;
        log::info!("📋 Job card {} completada", job_card.id);
    }

    Ok(ResponseJson(ApiResponse::success_with_message(
        job_card,
        "Job card updated successfully.".to_string(),
    )))
}

/// DELETE /api/jobcard/:id
pub async fn delete_job_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<ResponseJson<ApiResponse<()>>> {
    ensure_role(&auth, &[UserRole::Admin], "Access denied. Admin role required.")?;

    let repo = JobCardRepository::new(state.pool.clone());
    let job_card = repo.delete(id).await?.ok_or_else(|| not_found_error("Job card"))?;

    // Si era la job card en curso del camión, soltarla
    let truck_repo = TruckRepository::new(state.pool.clone());
    if let Some(truck) = truck_repo.find_by_id(job_card.truck_id).await? {
        if truck.current_job_card_id == Some(job_card.id) {
            truck_repo.clear_current_job_card(truck.id).await?;
        }
    }

    Ok(ResponseJson(ApiResponse::message_only(
        "Job card deleted successfully.".to_string(),
    )))
}
