//! Modelo de Driver
//!
//! Conductor de camiones, empleado por una empresa registrada
//! (associated_company) o por una empresa externa (external_company_details).
//! El flag is_registered_company_driver decide cuál de las dos está poblada.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::user::ExternalCompanyDetails;

/// Contacto de emergencia del conductor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    /// spouse | parent | sibling | child | friend | other
    pub relationship: String,
}

/// Licencia de conducir del conductor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseInfo {
    pub license_number: String,
    pub license_expiry: DateTime<Utc>,
    /// light | heavy | commercial
    pub license_type: String,
}

/// Driver principal - mapea exactamente a la tabla drivers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: Uuid,
    pub driver_name: String,
    pub driver_phone: String,
    pub driver_id_number: Option<String>,
    pub license_plate: Option<String>,
    pub emergency_contact: Option<Json<EmergencyContact>>,
    pub associated_company: Option<Uuid>,
    pub external_company_details: Option<Json<ExternalCompanyDetails>>,
    pub is_registered_company_driver: bool,
    pub truck_number: Option<String>,
    pub user_id: Uuid,
    pub license_info: Option<Json<LicenseInfo>>,
    pub is_active: bool,
    pub rating: Option<f32>,
    pub total_jobs: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
