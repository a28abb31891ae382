//! Modelo de User
//!
//! Usuario central del sistema con rol que condiciona campos y permisos.
//! Mapea exactamente a la tabla users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Rol del usuario - mapea al ENUM user_role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    General,
    TruckOwner,
    Company,
    CompanyDriver,
    UnregisteredDriver,
    Admin,
    Employee,
}

impl UserRole {
    /// Roles que exigen nombre en el registro
    pub fn requires_name(&self) -> bool {
        matches!(self, UserRole::General | UserRole::Employee | UserRole::TruckOwner)
    }

    /// Todos los roles salvo admin exigen teléfono
    pub fn requires_phone(&self) -> bool {
        !matches!(self, UserRole::Admin)
    }
}

/// Datos del conductor guardados como snapshot en el usuario
/// durante una transición de rol a company_driver/unregistered_driver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverInfo {
    pub name: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
}

/// Datos de una empresa externa (no registrada en el sistema)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalCompanyDetails {
    pub company_name: String,
    pub contact_person: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

/// User principal - mapea exactamente a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub license_plate: Option<String>,
    pub company_id: Option<Uuid>,
    pub truck_owner_id: Option<Uuid>,
    pub associated_trucks: Vec<Uuid>,
    pub driver_info: Option<Json<DriverInfo>>,
    pub company_details: Option<Json<ExternalCompanyDetails>>,
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub reset_code: Option<String>,
    #[serde(skip_serializing)]
    pub reset_code_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nombre_requerido_segun_rol() {
        assert!(UserRole::General.requires_name());
        assert!(UserRole::Employee.requires_name());
        assert!(UserRole::TruckOwner.requires_name());
        assert!(!UserRole::Admin.requires_name());
        assert!(!UserRole::Company.requires_name());
    }

    #[test]
    fn telefono_requerido_salvo_admin() {
        assert!(!UserRole::Admin.requires_phone());
        assert!(UserRole::General.requires_phone());
        assert!(UserRole::Company.requires_phone());
    }

    #[test]
    fn rol_serializa_en_snake_case() {
        assert_eq!(
            serde_json::to_string(&UserRole::TruckOwner).unwrap(),
            "\"truck_owner\""
        );
        assert_eq!(
            serde_json::from_str::<UserRole>("\"unregistered_driver\"").unwrap(),
            UserRole::UnregisteredDriver
        );
    }
}
