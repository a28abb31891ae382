//! Gate de perfil completo
//!
//! Las operaciones sensibles de empresa exigen un perfil en estado
//! `complete`. Si no lo está, la respuesta indica los campos que
//! faltan y el endpoint donde completarlos.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    Extension,
};
use uuid::Uuid;

use crate::dto::company_dto::completion_endpoint;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::company::{Company, ProfileStatus};
use crate::models::user::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Resolver la empresa sobre la que opera la request: la del usuario
/// autenticado si es company, o el primer UUID del path en otro caso
fn resolve_company_id(user: &AuthenticatedUser, path: &str) -> Option<Uuid> {
    if user.role == UserRole::Company {
        if let Some(id) = user.company_id {
            return Some(id);
        }
    }

    path.split('/').find_map(|segment| Uuid::parse_str(segment).ok())
}

/// Middleware que bloquea operaciones de empresa con perfil incompleto
pub async fn require_complete_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    // El propio endpoint de completado queda fuera del gate
    if path.ends_with("/complete-profile") {
        return Ok(next.run(request).await);
    }

    let company_id = resolve_company_id(&user, &path).ok_or_else(|| {
        AppError::BadRequest("Company could not be determined for this request.".to_string())
    })?;

    let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
        .bind(company_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found.".to_string()))?;

    if company.profile_status != ProfileStatus::Complete {
        return Err(AppError::IncompleteProfile {
            required_fields: company.remaining_profile_fields(),
            completion_endpoint: completion_endpoint(company.id),
        });
    }

    request.extensions_mut().insert(company);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usuario(role: UserRole, company_id: Option<Uuid>) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            role,
            email: "a@b.com".to_string(),
            company_id,
        }
    }

    #[test]
    fn usuario_company_usa_su_propia_empresa() {
        let id = Uuid::new_v4();
        let user = usuario(UserRole::Company, Some(id));
        let otro = Uuid::new_v4();

        let resolved = resolve_company_id(&user, &format!("/api/companies/{}", otro));
        assert_eq!(resolved, Some(id));
    }

    #[test]
    fn admin_usa_el_uuid_del_path() {
        let user = usuario(UserRole::Admin, None);
        let id = Uuid::new_v4();

        let resolved =
            resolve_company_id(&user, &format!("/api/companies/{}/add-associations", id));
        assert_eq!(resolved, Some(id));
    }

    #[test]
    fn sin_uuid_en_el_path_no_resuelve() {
        let user = usuario(UserRole::Employee, None);
        assert_eq!(resolve_company_id(&user, "/api/companies"), None);
    }
}
