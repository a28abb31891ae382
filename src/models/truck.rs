//! Modelo de Truck
//!
//! Camión bajo gestión del taller, con su historial de reparaciones
//! y los hitos de la reparación en curso.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del camión - mapea al ENUM truck_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "truck_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TruckStatus {
    Pending,
    Finalized,
}

/// Etapa de reparación de un hito
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RepairStage {
    #[serde(rename = "inspection")]
    Inspection,
    #[serde(rename = "repair in progress")]
    RepairInProgress,
    #[serde(rename = "quality check")]
    QualityCheck,
    #[serde(rename = "ready for pick-up")]
    ReadyForPickUp,
}

/// Hito de reparación con su fecha de finalización
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairMilestone {
    pub stage: RepairStage,
    pub completed_at: DateTime<Utc>,
}

/// Truck principal - mapea exactamente a la tabla trucks
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Truck {
    pub id: Uuid,
    pub license_plate: String,
    pub brand: String,
    pub owner: Uuid,
    pub company_id: Option<Uuid>,
    pub repair_history: Vec<Uuid>,
    pub current_job_card_id: Option<Uuid>,
    pub status: TruckStatus,
    pub repair_milestones: Json<Vec<RepairMilestone>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Truck {
    /// Añadir un hito de reparación. El hito `ready for pick-up`
    /// fuerza el estado a `finalized`.
    pub fn append_milestone(&mut self, stage: RepairStage) {
        self.repair_milestones.0.push(RepairMilestone {
            stage,
            completed_at: Utc::now(),
        });

        if stage == RepairStage::ReadyForPickUp {
            self.status = TruckStatus::Finalized;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn truck_pendiente() -> Truck {
        Truck {
            id: Uuid::new_v4(),
            license_plate: "AB-1234".to_string(),
            brand: "Volvo".to_string(),
            owner: Uuid::new_v4(),
            company_id: None,
            repair_history: vec![],
            current_job_card_id: None,
            status: TruckStatus::Pending,
            repair_milestones: Json(vec![]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn hito_intermedio_no_finaliza_el_camion() {
        let mut truck = truck_pendiente();
        truck.append_milestone(RepairStage::Inspection);
        truck.append_milestone(RepairStage::RepairInProgress);
        truck.append_milestone(RepairStage::QualityCheck);

        assert_eq!(truck.status, TruckStatus::Pending);
        assert_eq!(truck.repair_milestones.0.len(), 3);
    }

    #[test]
    fn ready_for_pick_up_fuerza_finalized() {
        let mut truck = truck_pendiente();
        truck.append_milestone(RepairStage::ReadyForPickUp);

        assert_eq!(truck.status, TruckStatus::Finalized);
    }

    #[test]
    fn etapas_serializan_con_los_nombres_del_wire() {
        assert_eq!(
            serde_json::to_string(&RepairStage::ReadyForPickUp).unwrap(),
            "\"ready for pick-up\""
        );
        assert_eq!(
            serde_json::from_str::<RepairStage>("\"repair in progress\"").unwrap(),
            RepairStage::RepairInProgress
        );
    }
}
