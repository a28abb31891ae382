//! Utilidades JWT
//!
//! Este módulo contiene funciones helper para generar y verificar
//! los tokens de sesión de la API.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::environment::EnvironmentConfig,
    models::user::UserRole,
    utils::errors::AppError,
};

/// Claims del JWT token
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,    // user id
    pub role: UserRole, // rol para control de acceso
    pub email: String,
    pub exp: usize, // expiration timestamp
    pub iat: usize, // issued at timestamp
}

/// Generar JWT token para un usuario autenticado
pub fn generate_token(
    user_id: Uuid,
    role: UserRole,
    email: &str,
    config: &EnvironmentConfig,
) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.jwt_expiration as i64);

    let claims = JwtClaims {
        sub: user_id.to_string(),
        role,
        email: email.to_string(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Jwt(format!("Error generando token: {}", e)))
}

/// Verificar y decodificar JWT token
pub fn verify_token(token: &str, config: &EnvironmentConfig) -> Result<JwtClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_ref());

    let token_data = decode::<JwtClaims>(token, &decoding_key, &Validation::default())
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::Jwt("Token expired. Please log in again.".to_string())
            }
            _ => AppError::Jwt("Invalid token. Unauthorized.".to_string()),
        })?;

    Ok(token_data.claims)
}

/// Extraer token del header Authorization
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Jwt("No token provided. Unauthorized.".to_string()))?;

    if token.is_empty() {
        return Err(AppError::Jwt("No token provided. Unauthorized.".to_string()));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EnvironmentConfig {
        EnvironmentConfig {
            environment: "test".to_string(),
            port: 3000,
            host: "127.0.0.1".to_string(),
            jwt_secret: "secreto-de-prueba".to_string(),
            jwt_expiration: 3600,
            cors_origins: vec![],
            rate_limit_requests: 5,
            rate_limit_window: 86400,
        }
    }

    #[test]
    fn genera_y_verifica_token() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let token =
            generate_token(user_id, UserRole::General, "a@b.com", &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, UserRole::General);
        assert_eq!(claims.email, "a@b.com");
    }

    #[test]
    fn rechaza_token_con_secreto_incorrecto() {
        let config = test_config();
        let token = generate_token(Uuid::new_v4(), UserRole::Admin, "a@b.com", &config).unwrap();

        let mut other = test_config();
        other.jwt_secret = "otro-secreto".to_string();
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn extrae_token_del_header() {
        assert_eq!(extract_token_from_header("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_token_from_header("abc.def.ghi").is_err());
        assert!(extract_token_from_header("Bearer ").is_err());
    }
}
