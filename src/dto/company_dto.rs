//! DTOs de empresa

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::company::{BankDetails, Company, CompanyLicenseDetails, CompanyOwnerDetails};

/// Request para registrar una empresa
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    pub company_name: String,
    pub contact_email: String,
}

/// Request para completar el perfil de la empresa.
/// licenseDetails y ownerDetails son obligatorios; bankDetails opcional
/// (sin banco el perfil queda en `basic`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteProfileRequest {
    pub bank_details: Option<Vec<BankDetails>>,
    pub license_details: Option<Vec<CompanyLicenseDetails>>,
    pub owner_details: Option<Vec<CompanyOwnerDetails>>,
}

/// Request para asociar conductores y camiones existentes
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAssociationsRequest {
    pub drivers: Option<Vec<Uuid>>,
    pub associated_trucks: Option<Vec<Uuid>>,
}

/// Request de actualización de datos no-perfil de la empresa
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyRequest {
    pub company_name: Option<String>,
    pub contact_email: Option<String>,
}

/// Pasos siguientes tras crear o actualizar el perfil
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextSteps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_fields: Option<Vec<String>>,
    pub endpoint: String,
}

/// Response de empresa con la guía de completado del perfil
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfileResponse {
    pub success: bool,
    pub message: String,
    pub company: Company,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<NextSteps>,
}

/// Endpoint de completado de perfil para una empresa dada
pub fn completion_endpoint(company_id: Uuid) -> String {
    format!("/api/companies/{}/complete-profile", company_id)
}
