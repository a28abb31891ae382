//! DTOs de job card

use serde::Deserialize;
use uuid::Uuid;

use crate::models::job_card::{JobCardStatus, RepairLineItem};

/// Request para crear una job card
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobCardRequest {
    pub truck_id: Uuid,
    pub description: Vec<RepairLineItem>,
    pub status: Option<JobCardStatus>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    pub company_id: Option<Uuid>,
}

/// Request de actualización de job card
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobCardRequest {
    pub description: Option<Vec<RepairLineItem>>,
    pub status: Option<JobCardStatus>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    pub company_id: Option<Uuid>,
}

/// Filtros del listado de job cards
#[derive(Debug, Deserialize)]
pub struct JobCardListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<JobCardStatus>,
}
