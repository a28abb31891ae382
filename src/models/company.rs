//! Modelo de Company
//!
//! Empresa registrada que puede emplear conductores y poseer camiones.
//! El estado del perfil (initial → basic → complete) se deriva siempre
//! de los detalles presentes, en un único lugar: [`ProfileStatus::derive`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del perfil de la empresa - mapea al ENUM profile_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "profile_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
    Initial,
    Basic,
    Complete,
}

impl ProfileStatus {
    /// Derivar el estado del perfil a partir de los detalles presentes:
    /// complete ⟺ banco + licencia + propietario; basic ⟺ licencia +
    /// propietario sin banco; initial en cualquier otro caso.
    pub fn derive(has_bank: bool, has_license: bool, has_owner: bool) -> Self {
        match (has_bank, has_license, has_owner) {
            (true, true, true) => ProfileStatus::Complete,
            (false, true, true) => ProfileStatus::Basic,
            _ => ProfileStatus::Initial,
        }
    }

    /// Campos que faltan para llegar a `complete`, en el formato
    /// del wire (camelCase) que consume el cliente
    pub fn remaining_fields(has_bank: bool, has_license: bool, has_owner: bool) -> Vec<String> {
        let mut fields = Vec::new();
        if !has_license {
            fields.push("licenseDetails".to_string());
        }
        if !has_owner {
            fields.push("ownerDetails".to_string());
        }
        if !has_bank {
            fields.push("bankDetails".to_string());
        }
        fields
    }
}

/// Datos bancarios de la empresa
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    pub bank_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub account_name: String,
    pub currency_type: String,
    pub iban: String,
    pub swift_code: String,
}

/// Licencia comercial de la empresa
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyLicenseDetails {
    pub company_full_name: String,
    pub company_license_number: String,
    pub license_type: String,
    pub issuing_authority: String,
    #[serde(rename = "TRN")]
    pub trn: String,
    pub creation_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
}

/// Datos del propietario de la empresa
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyOwnerDetails {
    pub owner_full_name: String,
    pub owner_id_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_passport_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_address: Option<String>,
    pub owner_phone: String,
    pub owner_email: String,
}

/// Company principal - mapea exactamente a la tabla companies
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub truck_owner_id: Option<Uuid>,
    pub company_name: String,
    pub contact_email: String,
    pub profile_status: ProfileStatus,
    pub bank_details: Json<Vec<BankDetails>>,
    pub license_details: Json<Vec<CompanyLicenseDetails>>,
    pub owner_details: Json<Vec<CompanyOwnerDetails>>,
    pub drivers: Vec<Uuid>,
    pub associated_trucks: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// Campos que aún faltan para que este perfil llegue a `complete`
    pub fn remaining_profile_fields(&self) -> Vec<String> {
        ProfileStatus::remaining_fields(
            !self.bank_details.0.is_empty(),
            !self.license_details.0.is_empty(),
            !self.owner_details.0.is_empty(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivacion_cubre_las_ocho_combinaciones() {
        // (banco, licencia, propietario) → estado
        assert_eq!(ProfileStatus::derive(true, true, true), ProfileStatus::Complete);
        assert_eq!(ProfileStatus::derive(false, true, true), ProfileStatus::Basic);
        assert_eq!(ProfileStatus::derive(true, false, true), ProfileStatus::Initial);
        assert_eq!(ProfileStatus::derive(true, true, false), ProfileStatus::Initial);
        assert_eq!(ProfileStatus::derive(true, false, false), ProfileStatus::Initial);
        assert_eq!(ProfileStatus::derive(false, true, false), ProfileStatus::Initial);
        assert_eq!(ProfileStatus::derive(false, false, true), ProfileStatus::Initial);
        assert_eq!(ProfileStatus::derive(false, false, false), ProfileStatus::Initial);
    }

    #[test]
    fn no_se_llega_a_complete_sin_licencia_y_propietario() {
        // Con banco pero sin licencia o propietario nunca hay complete
        for (license, owner) in [(false, false), (false, true), (true, false)] {
            assert_ne!(
                ProfileStatus::derive(true, license, owner),
                ProfileStatus::Complete
            );
        }
    }

    #[test]
    fn campos_pendientes_derivados_del_mismo_invariante() {
        assert_eq!(
            ProfileStatus::remaining_fields(false, true, true),
            vec!["bankDetails".to_string()]
        );
        assert_eq!(
            ProfileStatus::remaining_fields(false, false, false),
            vec![
                "licenseDetails".to_string(),
                "ownerDetails".to_string(),
                "bankDetails".to_string()
            ]
        );
        assert!(ProfileStatus::remaining_fields(true, true, true).is_empty());
    }
}
