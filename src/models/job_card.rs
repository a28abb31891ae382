//! Modelo de JobCard
//!
//! Unidad de trabajo de reparación sobre un camión. Los campos de
//! conductor y la referencia a la empresa van juntos: o los tres
//! (driver_name, driver_phone, company_id) o ninguno.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la job card - mapea al ENUM job_card_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "job_card_status")]
pub enum JobCardStatus {
    #[sqlx(rename = "in-progress")]
    #[serde(rename = "in-progress")]
    InProgress,
    #[sqlx(rename = "completed")]
    #[serde(rename = "completed")]
    Completed,
    #[sqlx(rename = "archived")]
    #[serde(rename = "archived")]
    Archived,
}

/// Línea de reparación: repuesto y mano de obra
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairLineItem {
    pub part_name: String,
    pub part_cost: Decimal,
    pub repair_fee: Decimal,
}

/// JobCard principal - mapea exactamente a la tabla job_cards
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobCard {
    pub id: Uuid,
    pub truck_id: Uuid,
    pub entry_date: DateTime<Utc>,
    pub description: Json<Vec<RepairLineItem>>,
    pub status: JobCardStatus,
    pub completed_date: Option<DateTime<Utc>>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    pub company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Regla de conductor/empresa: los tres campos juntos o ninguno.
/// Sustituye la definición circular del requisito condicional que
/// no podía satisfacerse aportando solo una de las partes.
pub fn validate_driver_company_rule(
    driver_name: &Option<String>,
    driver_phone: &Option<String>,
    company_id: &Option<Uuid>,
) -> Result<(), String> {
    let present = [
        driver_name.is_some(),
        driver_phone.is_some(),
        company_id.is_some(),
    ];

    if present.iter().all(|p| *p) || present.iter().all(|p| !*p) {
        Ok(())
    } else {
        Err(
            "driverName, driverPhone and companyId must be provided together or not at all."
                .to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todos_o_ninguno() {
        let id = Some(Uuid::new_v4());
        let name = Some("Omar".to_string());
        let phone = Some("0501234567".to_string());

        assert!(validate_driver_company_rule(&name, &phone, &id).is_ok());
        assert!(validate_driver_company_rule(&None, &None, &None).is_ok());

        assert!(validate_driver_company_rule(&name, &None, &None).is_err());
        assert!(validate_driver_company_rule(&None, &phone, &None).is_err());
        assert!(validate_driver_company_rule(&None, &None, &id).is_err());
        assert!(validate_driver_company_rule(&name, &phone, &None).is_err());
    }

    #[test]
    fn status_serializa_con_guion() {
        assert_eq!(
            serde_json::to_string(&JobCardStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
    }
}
