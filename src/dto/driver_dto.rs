//! DTOs de conductor

use serde::Deserialize;
use uuid::Uuid;

use crate::models::driver::{EmergencyContact, LicenseInfo};
use crate::models::user::ExternalCompanyDetails;

/// Request para crear un conductor. associatedCompany y
/// externalCompanyDetails son mutuamente excluyentes: la primera marca
/// al conductor como de empresa registrada, la segunda como externo.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriverRequest {
    pub driver_name: String,
    pub driver_phone: String,
    pub driver_id_number: String,
    pub license_plate: Option<String>,
    pub emergency_contact: Option<EmergencyContact>,
    pub associated_company: Option<Uuid>,
    pub external_company_details: Option<ExternalCompanyDetails>,
    pub truck_number: Option<String>,
    pub license_info: Option<LicenseInfo>,
}

/// Request de actualización de conductor (a nivel de campo)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDriverRequest {
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    pub license_plate: Option<String>,
    pub emergency_contact: Option<EmergencyContact>,
    pub external_company_details: Option<ExternalCompanyDetails>,
    pub truck_number: Option<String>,
}
