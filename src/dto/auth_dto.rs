//! DTOs de autenticación

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;

/// Request de registro de usuario. Los campos específicos de rol
/// (companyName, licensePlate) solo se persisten para el rol que los usa.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub company_name: Option<String>,
    pub license_plate: Option<String>,
    pub role: Option<UserRole>,
}

/// Request de login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response de registro/login con el token de sesión
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    pub role: UserRole,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Request de solicitud de código de reset de contraseña
#[derive(Debug, Deserialize)]
pub struct RequestResetCodeRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Request de verificación del código y cambio de contraseña
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub reset_code: String,
    pub new_password: String,
}
