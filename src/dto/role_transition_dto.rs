//! DTOs de transición de rol
//!
//! La request cruda se convierte en la variante tipada [`RoleTransition`],
//! una por rol destino con exactamente los campos que ese rol exige.
//! Un payload malformado nunca llega al código de creación de entidades:
//! la conversión falla con la lista completa de errores de validación.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::company::Company;
use crate::models::user::{DriverInfo, ExternalCompanyDetails, User};
use crate::utils::validation;

/// Payload crudo del POST de transición de rol
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleTransitionRequest {
    pub role: String,
    pub company_name: Option<String>,
    pub license_plate: Option<String>,
    pub company_id: Option<Uuid>,
    pub driver_info: Option<DriverInfoPayload>,
    pub company_details: Option<CompanyDetailsPayload>,
    pub brand: Option<String>,
}

/// Datos del conductor dentro de la request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverInfoPayload {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub id_number: Option<String>,
    pub license_plate: Option<String>,
}

/// Datos de la empresa externa dentro de la request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetailsPayload {
    pub company_name: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
}

/// Transición de rol validada: una variante por rol destino,
/// con exactamente los campos requeridos por ese rol
#[derive(Debug, Clone)]
pub enum RoleTransition {
    Company {
        company_name: Option<String>,
    },
    CompanyDriver {
        company_id: Uuid,
        driver_info: DriverInfo,
    },
    UnregisteredDriver {
        driver_info: DriverInfo,
        company_details: ExternalCompanyDetails,
    },
    TruckOwner {
        license_plate: String,
        brand: String,
    },
}

impl RoleTransitionRequest {
    /// Validar el payload contra la tabla de campos requeridos del rol
    /// destino. Devuelve TODOS los errores, no solo el primero.
    pub fn validate(self) -> Result<RoleTransition, Vec<String>> {
        let mut errors = Vec::new();

        let transition = match self.role.as_str() {
            "company" => {
                // companyName es opcional: si falta se deriva del email
                Some(RoleTransition::Company {
                    company_name: self.company_name.filter(|n| !n.trim().is_empty()),
                })
            }

            "company_driver" => {
                let company_id = self.company_id;
                if company_id.is_none() {
                    errors.push("Company ID is required.".to_string());
                }
                let driver_info = validate_driver_info(self.driver_info, &mut errors);

                match (company_id, driver_info) {
                    (Some(company_id), Some(driver_info)) => Some(RoleTransition::CompanyDriver {
                        company_id,
                        driver_info,
                    }),
                    _ => None,
                }
            }

            "unregistered_driver" => {
                let driver_info = validate_driver_info(self.driver_info, &mut errors);
                let company_details =
                    validate_company_details(self.company_details, &mut errors);

                match (driver_info, company_details) {
                    (Some(driver_info), Some(company_details)) => {
                        Some(RoleTransition::UnregisteredDriver {
                            driver_info,
                            company_details,
                        })
                    }
                    _ => None,
                }
            }

            "truck_owner" => {
                let license_plate = self.license_plate.filter(|p| !p.trim().is_empty());
                let brand = self.brand.filter(|b| !b.trim().is_empty());

                if license_plate.is_none() {
                    errors.push("License plate is required.".to_string());
                }
                if brand.is_none() {
                    errors.push("Truck brand is required.".to_string());
                }
                if let Some(ref plate) = license_plate {
                    if validation::validate_license_plate(plate).is_err() {
                        errors.push(
                            "License plate must be 2-11 characters (A-Z, 0-9, hyphens)."
                                .to_string(),
                        );
                    }
                }

                match (license_plate, brand) {
                    (Some(license_plate), Some(brand)) if errors.is_empty() => {
                        Some(RoleTransition::TruckOwner {
                            license_plate,
                            brand,
                        })
                    }
                    _ => None,
                }
            }

            _ => {
                errors.push("Invalid role specified.".to_string());
                None
            }
        };

        match transition {
            Some(transition) if errors.is_empty() => Ok(transition),
            _ => Err(errors),
        }
    }
}

fn validate_driver_info(
    payload: Option<DriverInfoPayload>,
    errors: &mut Vec<String>,
) -> Option<DriverInfo> {
    let Some(payload) = payload else {
        errors.push("Driver information is required.".to_string());
        return None;
    };

    let name = payload.name.filter(|n| !n.trim().is_empty());
    let phone_number = payload.phone_number.filter(|p| !p.trim().is_empty());

    if name.is_none() {
        errors.push("Driver name is required.".to_string());
    }
    match phone_number {
        None => errors.push("Driver phone number is required.".to_string()),
        Some(ref phone) => {
            if validation::validate_phone(phone).is_err() {
                errors.push("Driver phone must be a valid international number.".to_string());
            }
        }
    }

    match (name, phone_number) {
        (Some(name), Some(phone_number)) => Some(DriverInfo {
            name,
            phone_number,
            id_number: payload.id_number,
            license_plate: payload.license_plate,
        }),
        _ => None,
    }
}

fn validate_company_details(
    payload: Option<CompanyDetailsPayload>,
    errors: &mut Vec<String>,
) -> Option<ExternalCompanyDetails> {
    let Some(payload) = payload else {
        errors.push("Company information is required.".to_string());
        return None;
    };

    let company_name = payload.company_name.filter(|n| !n.trim().is_empty());
    let contact_person = payload.contact_person.filter(|c| !c.trim().is_empty());

    if company_name.is_none() {
        errors.push("External company name is required.".to_string());
    }
    if contact_person.is_none() {
        errors.push("External company contact person is required.".to_string());
    }

    match (company_name, contact_person) {
        (Some(company_name), Some(contact_person)) => Some(ExternalCompanyDetails {
            company_name,
            contact_person,
            contact_phone: payload.contact_phone,
        }),
        _ => None,
    }
}

/// Response de la transición de rol
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleTransitionResponse {
    pub success: bool,
    pub message: String,
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_profile_completion: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request(role: &str) -> RoleTransitionRequest {
        RoleTransitionRequest {
            role: role.to_string(),
            company_name: None,
            license_plate: None,
            company_id: None,
            driver_info: None,
            company_details: None,
            brand: None,
        }
    }

    #[test]
    fn company_sin_nombre_es_valida() {
        // El nombre se deriva del email del usuario si falta
        let transition = base_request("company").validate().unwrap();
        assert!(matches!(
            transition,
            RoleTransition::Company { company_name: None }
        ));
    }

    #[test]
    fn truck_owner_sin_matricula_ni_marca_lista_ambos_errores() {
        let errors = base_request("truck_owner").validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("License plate")));
        assert!(errors.iter().any(|e| e.contains("brand")));
    }

    #[test]
    fn truck_owner_con_matricula_invalida_falla() {
        let mut request = base_request("truck_owner");
        request.license_plate = Some("ab".to_string());
        request.brand = Some("Volvo".to_string());

        let errors = request.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("2-11 characters")));
    }

    #[test]
    fn company_driver_requiere_company_id_y_driver_info() {
        let errors = base_request("company_driver").validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("Company ID")));
        assert!(errors.iter().any(|e| e.contains("Driver information")));
    }

    #[test]
    fn company_driver_valido() {
        let mut request = base_request("company_driver");
        request.company_id = Some(Uuid::new_v4());
        request.driver_info = Some(DriverInfoPayload {
            name: Some("Ahmed".to_string()),
            phone_number: Some("+971500000000".to_string()),
            id_number: None,
            license_plate: None,
        });

        assert!(matches!(
            request.validate().unwrap(),
            RoleTransition::CompanyDriver { .. }
        ));
    }

    #[test]
    fn unregistered_driver_requiere_empresa_externa() {
        let mut request = base_request("unregistered_driver");
        request.driver_info = Some(DriverInfoPayload {
            name: Some("Ahmed".to_string()),
            phone_number: Some("+971500000000".to_string()),
            id_number: None,
            license_plate: None,
        });

        let errors = request.clone().validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("Company information")));

        request.company_details = Some(CompanyDetailsPayload {
            company_name: Some("Desert Logistics".to_string()),
            contact_person: Some("Sara".to_string()),
            contact_phone: None,
        });
        assert!(matches!(
            request.validate().unwrap(),
            RoleTransition::UnregisteredDriver { .. }
        ));
    }

    #[test]
    fn rol_desconocido_es_rechazado() {
        let errors = base_request("astronaut").validate().unwrap_err();
        assert_eq!(errors, vec!["Invalid role specified.".to_string()]);
    }

    #[test]
    fn telefono_invalido_del_conductor_es_rechazado() {
        let mut request = base_request("company_driver");
        request.company_id = Some(Uuid::new_v4());
        request.driver_info = Some(DriverInfoPayload {
            name: Some("Ahmed".to_string()),
            phone_number: Some("abc".to_string()),
            id_number: None,
            license_plate: None,
        });

        let errors = request.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("valid international number")));
    }
}
