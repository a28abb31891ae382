pub mod auth_dto;
pub mod company_dto;
pub mod driver_dto;
pub mod job_card_dto;
pub mod role_transition_dto;
pub mod truck_dto;
pub mod user_dto;

use serde::{Deserialize, Serialize};

/// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message_only(message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: None,
        }
    }
}

/// Metadatos de paginación para listados
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        Self {
            total,
            current_page: page,
            total_pages: (total + limit - 1) / limit.max(1),
        }
    }
}

/// Response para listados paginados
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    pub metadata: PaginationMeta,
    pub data: Vec<T>,
}

/// Parámetros de paginación en query string
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationQuery {
    /// page y limit con los defaults del API (1, 10)
    pub fn resolve(&self) -> (i64, i64) {
        (self.page.unwrap_or(1), self.limit.unwrap_or(10))
    }
}
