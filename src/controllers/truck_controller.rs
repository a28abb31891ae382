//! Controller de camiones
//!
//! Registro de camiones y seguimiento de la reparación por hitos.
//! El hito `ready for pick-up` finaliza el camión.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::Json as ResponseJson,
    Extension,
};
use uuid::Uuid;

use crate::dto::truck_dto::{CreateTruckRequest, RepairStatusRequest, UpdateTruckRequest};
use crate::dto::{ApiResponse, PaginatedResponse, PaginationMeta, PaginationQuery};
use crate::middleware::auth::{ensure_role, AuthenticatedUser};
use crate::models::truck::Truck;
use crate::models::user::UserRole;
use crate::repositories::{CompanyRepository, TruckRepository, UserRepository};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation;

const WRITE_ROLES: &[UserRole] = &[UserRole::Admin, UserRole::Company];
const READ_ROLES: &[UserRole] = &[UserRole::Admin, UserRole::Company, UserRole::Employee];

/// La edición la autorizan el dueño del camión o su empresa asociada
fn ensure_truck_update_access(auth: &AuthenticatedUser, truck: &Truck) -> Result<(), AppError> {
    let is_owner = truck.owner == auth.user_id;
    let is_associated_company =
        truck.company_id.is_some() && truck.company_id == auth.company_id;

    if !is_owner && !is_associated_company {
        return Err(AppError::Forbidden(
            "Not authorized to update this truck.".to_string(),
        ));
    }
    Ok(())
}

/// El borrado solo lo autoriza el dueño del camión
fn ensure_truck_owner(auth: &AuthenticatedUser, truck: &Truck) -> Result<(), AppError> {
    if truck.owner != auth.user_id {
        return Err(AppError::Forbidden(
            "Not authorized to delete this truck.".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/trucks
pub async fn create_truck(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateTruckRequest>,
) -> AppResult<(StatusCode, ResponseJson<ApiResponse<Truck>>)> {
    ensure_role(&auth, WRITE_ROLES, "Access denied. Admin or company role required.")?;

    let mut errors = Vec::new();
    if validation::validate_license_plate(&payload.license_plate).is_err() {
        errors.push("License plate must be 2-11 characters (A-Z, 0-9, hyphens).".to_string());
    }
    if payload.brand.trim().is_empty() {
        errors.push("Truck brand is required.".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::ValidationList(errors));
    }

    // El rol company registra camiones contra su propia empresa
    let company_id = match auth.role {
        UserRole::Company => auth.company_id,
        _ => payload.company_id,
    };
    if let Some(company_id) = company_id {
        let company_repo = CompanyRepository::new(state.pool.clone());
        if company_repo.find_by_id(company_id).await?.is_none() {
            return Err(not_found_error("Company"));
        }
    }

    let repo = TruckRepository::new(state.pool.clone());

    if repo
        .find_by_license_plate(&payload.license_plate)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(vec!["licensePlate".to_string()]));
    }

    let truck = repo
        .create(&payload.license_plate, &payload.brand, auth.user_id, company_id)
        .await?;

    // Referencias directas: el camión queda en el usuario y en la empresa
    let user_repo = UserRepository::new(state.pool.clone());
    user_repo.push_associated_truck(auth.user_id, truck.id).await?;
    if let Some(company_id) = truck.company_id {
        let company_repo = CompanyRepository::new(state.pool.clone());
        company_repo
            .push_associations(company_id, &[], &[truck.id])
            .await?;
    }

    log::info!("🚛 Camión registrado: {} ({})", truck.license_plate, truck.id);

    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success_with_message(
        truck,
        "Truck registered successfully.".to_string(),
    ))))
}

/// GET /api/trucks
pub async fn get_trucks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<ResponseJson<PaginatedResponse<Truck>>> {
    ensure_role(&auth, READ_ROLES, "Access denied.")?;

    let (page, limit) = pagination.resolve();
    validation::validate_pagination(page, limit)?;

    let repo = TruckRepository::new(state.pool.clone());
    let total = repo.count().await?;
    let trucks = repo.list(page, limit).await?;

    Ok(ResponseJson(PaginatedResponse {
        success: true,
        metadata: PaginationMeta::new(total, page, limit),
        data: trucks,
    }))
}

/// GET /api/trucks/:id
pub async fn get_truck_by_id(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<ResponseJson<ApiResponse<Truck>>> {
    ensure_role(&auth, READ_ROLES, "Access denied.")?;

    let repo = TruckRepository::new(state.pool.clone());
    let truck = repo.find_by_id(id).await?.ok_or_else(|| not_found_error("Truck"))?;

    Ok(ResponseJson(ApiResponse::success(truck)))
}

/// PUT /api/trucks/:id
pub async fn update_truck(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTruckRequest>,
) -> AppResult<ResponseJson<ApiResponse<Truck>>> {
    ensure_role(&auth, WRITE_ROLES, "Access denied. Admin or company role required.")?;

    let repo = TruckRepository::new(state.pool.clone());
    let truck = repo.find_by_id(id).await?.ok_or_else(|| not_found_error("Truck"))?;
    ensure_truck_update_access(&auth, &truck)?;

    let truck = repo
        .update(id, payload.brand.as_deref(), payload.status)
        .await?
        .ok_or_else(|| not_found_error("Truck"))?;

    Ok(ResponseJson(ApiResponse::success_with_message(
        truck,
        "Truck updated successfully.".to_string(),
    )))
}

/// PATCH /api/trucks/:id/repair-status
pub async fn update_repair_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RepairStatusRequest>,
) -> AppResult<ResponseJson<ApiResponse<Truck>>> {
    ensure_role(
        &auth,
        &[UserRole::Admin, UserRole::Employee],
        "Access denied. Admin or employee role required.",
    )?;

    let repo = TruckRepository::new(state.pool.clone());
    let mut truck = repo.find_by_id(id).await?.ok_or_else(|| not_found_error("Truck"))?;

    truck.append_milestone(payload.stage);

    let truck = repo
        .save_milestones(id, &truck.repair_milestones.0, truck.status)
        .await?
        .ok_or_else(|| not_found_error("Truck"))?;

    log::info!(
        "🔧 Hito {:?} registrado en camión {} (estado {:?})",
        payload.stage,
        truck.id,
        truck.status
    );

    Ok(ResponseJson(ApiResponse::success_with_message(
        truck,
        "Repair status updated successfully.".to_string(),
    )))
}

/// DELETE /api/trucks/:id
pub async fn delete_truck(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<ResponseJson<ApiResponse<()>>> {
    ensure_role(&auth, WRITE_ROLES, "Access denied. Admin or company role required.")?;

    let repo = TruckRepository::new(state.pool.clone());
    let truck = repo.find_by_id(id).await?.ok_or_else(|| not_found_error("Truck"))?;
    ensure_truck_owner(&auth, &truck)?;

    let truck = repo.delete(id).await?.ok_or_else(|| not_found_error("Truck"))?;

    // Quitar las referencias directas; el historial de job cards se conserva
    let user_repo = UserRepository::new(state.pool.clone());
    user_repo.pull_associated_truck(truck.owner, truck.id).await?;
    if let Some(company_id) = truck.company_id {
        let company_repo = CompanyRepository::new(state.pool.clone());
        company_repo.pull_truck(company_id, truck.id).await?;
    }
    if !truck.repair_history.is_empty() {
        log::warn!(
            "🗑️ Camión {} eliminado con {} job cards en su historial",
            truck.id,
            truck.repair_history.len()
        );
    }

    Ok(ResponseJson(ApiResponse::message_only(
        "Truck deleted successfully.".to_string(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::truck::TruckStatus;
    use chrono::Utc;
    use sqlx::types::Json;

    fn camion(owner: Uuid, company_id: Option<Uuid>) -> Truck {
        Truck {
            id: Uuid::new_v4(),
            license_plate: "AB-1234".to_string(),
            brand: "Volvo".to_string(),
            owner,
            company_id,
            repair_history: vec![],
            current_job_card_id: None,
            status: TruckStatus::Pending,
            repair_milestones: Json(vec![]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn usuario(role: UserRole, user_id: Uuid, company_id: Option<Uuid>) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id,
            role,
            email: "a@b.com".to_string(),
            company_id,
        }
    }

    #[test]
    fn el_dueno_puede_editar_su_camion() {
        let owner_id = Uuid::new_v4();
        let auth = usuario(UserRole::Admin, owner_id, None);
        let truck = camion(owner_id, None);

        assert!(ensure_truck_update_access(&auth, &truck).is_ok());
    }

    #[test]
    fn la_empresa_asociada_puede_editar_el_camion() {
        let company_id = Uuid::new_v4();
        let auth = usuario(UserRole::Company, Uuid::new_v4(), Some(company_id));
        let truck = camion(Uuid::new_v4(), Some(company_id));

        assert!(ensure_truck_update_access(&auth, &truck).is_ok());
    }

    #[test]
    fn un_admin_que_no_es_dueno_no_puede_editar() {
        let auth = usuario(UserRole::Admin, Uuid::new_v4(), None);
        let truck = camion(Uuid::new_v4(), None);

        let err = ensure_truck_update_access(&auth, &truck).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn un_camion_sin_empresa_no_autoriza_por_empresa() {
        // company_id None en ambos lados no debe contar como coincidencia
        let auth = usuario(UserRole::Company, Uuid::new_v4(), None);
        let truck = camion(Uuid::new_v4(), None);

        assert!(ensure_truck_update_access(&auth, &truck).is_err());
    }

    #[test]
    fn solo_el_dueno_puede_borrar() {
        let owner_id = Uuid::new_v4();
        let company_id = Uuid::new_v4();
        let truck = camion(owner_id, Some(company_id));

        let dueno = usuario(UserRole::Company, owner_id, Some(company_id));
        assert!(ensure_truck_owner(&dueno, &truck).is_ok());

        // Ni la empresa asociada ni un admin ajeno pueden borrar
        let empresa = usuario(UserRole::Company, Uuid::new_v4(), Some(company_id));
        assert!(ensure_truck_owner(&empresa, &truck).is_err());
        let admin = usuario(UserRole::Admin, Uuid::new_v4(), None);
        assert!(ensure_truck_owner(&admin, &truck).is_err());
    }
}
