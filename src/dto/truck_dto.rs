//! DTOs de camión

use serde::Deserialize;
use uuid::Uuid;

use crate::models::truck::{RepairStage, TruckStatus};

/// Request para registrar un camión
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTruckRequest {
    pub license_plate: String,
    pub brand: String,
    pub company_id: Option<Uuid>,
}

/// Request de actualización de camión
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTruckRequest {
    pub brand: Option<String>,
    pub status: Option<TruckStatus>,
}

/// Request para añadir un hito de reparación.
/// Una etapa desconocida falla en la deserialización del enum.
#[derive(Debug, Deserialize)]
pub struct RepairStatusRequest {
    pub stage: RepairStage,
}
