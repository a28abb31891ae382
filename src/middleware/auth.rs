//! Middleware de autenticación JWT
//!
//! Extrae y verifica el token, comprueba que el usuario sigue
//! existiendo y activo, e inyecta el usuario autenticado en la request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::models::user::{User, UserRole};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{extract_token_from_header, verify_token};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: UserRole,
    pub email: String,
    pub company_id: Option<Uuid>,
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .ok_or_else(|| AppError::Jwt("No token provided. Unauthorized.".to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, &state.config)?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Jwt("Invalid token. Unauthorized.".to_string()))?;

    // El token puede sobrevivir al usuario: verificar contra la base
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found. Unauthorized.".to_string()))?;

    if !user.is_active {
        return Err(AppError::Unauthorized(
            "User account is deactivated.".to_string(),
        ));
    }

    let authenticated_user = AuthenticatedUser {
        user_id: user.id,
        role: user.role,
        email: user.email,
        company_id: user.company_id,
    };

    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

/// Verificar que el rol del usuario está entre los permitidos
pub fn ensure_role(
    user: &AuthenticatedUser,
    allowed: &[UserRole],
    message: &str,
) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(message.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usuario(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            role,
            email: "a@b.com".to_string(),
            company_id: None,
        }
    }

    #[test]
    fn ensure_role_acepta_roles_permitidos() {
        let user = usuario(UserRole::Admin);
        assert!(ensure_role(&user, &[UserRole::Admin, UserRole::Employee], "no").is_ok());
    }

    #[test]
    fn ensure_role_rechaza_el_resto() {
        let user = usuario(UserRole::General);
        let err = ensure_role(&user, &[UserRole::Admin], "Access denied.").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
