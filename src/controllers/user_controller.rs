//! Controller de usuarios

use axum::{
    extract::{Json, Path, Query, State},
    response::Json as ResponseJson,
    Extension,
};
use uuid::Uuid;

use crate::dto::user_dto::UpdateUserRequest;
use crate::dto::{ApiResponse, PaginatedResponse, PaginationMeta, PaginationQuery};
use crate::middleware::auth::{ensure_role, AuthenticatedUser};
use crate::models::user::{User, UserRole};
use crate::repositories::UserRepository;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::validation;

/// GET /api/users
pub async fn get_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<ResponseJson<PaginatedResponse<User>>> {
    ensure_role(
        &auth,
        &[UserRole::Admin, UserRole::Employee],
        "Access denied. Admin or employee role required.",
    )?;

    let (page, limit) = pagination.resolve();
    validation::validate_pagination(page, limit)?;

    let repo = UserRepository::new(state.pool.clone());
    let total = repo.count().await?;
    let users = repo.list(page, limit).await?;

    Ok(ResponseJson(PaginatedResponse {
        success: true,
        metadata: PaginationMeta::new(total, page, limit),
        data: users,
    }))
}

/// GET /api/users/:id
pub async fn get_user_by_id(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<ResponseJson<ApiResponse<User>>> {
    ensure_role(
        &auth,
        &[UserRole::Admin, UserRole::Employee],
        "Access denied. Admin or employee role required.",
    )?;

    let repo = UserRepository::new(state.pool.clone());
    let user = repo.find_by_id(id).await?.ok_or_else(|| not_found_error("User"))?;

    Ok(ResponseJson(ApiResponse::success(user)))
}

/// PUT /api/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<ResponseJson<ApiResponse<User>>> {
    ensure_role(&auth, &[UserRole::Admin], "Access denied. Admin role required.")?;

    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .update(id, &payload)
        .await?
        .ok_or_else(|| not_found_error("User"))?;

    log::info!("✏️ Usuario actualizado: {}", user.id);

    Ok(ResponseJson(ApiResponse::success_with_message(
        user,
        "User updated successfully.".to_string(),
    )))
}

/// DELETE /api/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<ResponseJson<ApiResponse<()>>> {
    ensure_role(&auth, &[UserRole::Admin], "Access denied. Admin role required.")?;

    let repo = UserRepository::new(state.pool.clone());
    let user = repo.delete(id).await?.ok_or_else(|| not_found_error("User"))?;

    // Las entidades asociadas no se borran en cascada
    if user.company_id.is_some() || !user.associated_trucks.is_empty() {
        log::warn!(
            "🗑️ Usuario {} eliminado con referencias vivas (company: {:?}, trucks: {})",
            user.id,
            user.company_id,
            user.associated_trucks.len()
        );
    }

    Ok(ResponseJson(ApiResponse::message_only(
        "User deleted successfully.".to_string(),
    )))
}
