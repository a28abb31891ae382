//! DTOs de usuario

use serde::Deserialize;

/// Request de actualización de usuario. Los campos sensibles
/// (role, password, resetCode) no son actualizables por esta vía:
/// simplemente no existen en el DTO.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub license_plate: Option<String>,
    pub is_active: Option<bool>,
}
