//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Lista de errores de validación legibles (todos los campos, no solo el primero)
    #[error("Validation errors: {0:?}")]
    ValidationList(Vec<String>),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Violación de unicidad: se responde 400 con la lista de campos en conflicto
    #[error("Conflict on fields: {0:?}")]
    Conflict(Vec<String>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Company inexistente en una transición a company_driver: 400 recuperable
    /// con la alternativa de registrarse como unregistered_driver
    #[error("Company not found (recoverable)")]
    RecoverableCompanyNotFound,

    /// Perfil de company incompleto: 400 con los campos pendientes
    #[error("Incomplete company profile")]
    IncompleteProfile {
        required_fields: Vec<String>,
        completion_endpoint: String,
    },

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(message: String, code: &str) -> Self {
        Self {
            success: false,
            message,
            details: None,
            code: Some(code.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "Error de base de datos");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "An error occurred while accessing the database.".to_string(),
                        "DB_ERROR",
                    ),
                )
            }

            AppError::Validation(e) => {
                tracing::warn!(error = %e, "Error de validación");
                let mut response = ErrorResponse::new(
                    "The provided data is invalid.".to_string(),
                    "VALIDATION_ERROR",
                );
                response.details = Some(json!(e));
                (StatusCode::BAD_REQUEST, response)
            }

            AppError::ValidationList(errors) => {
                tracing::warn!(?errors, "Errores de validación");
                let mut response = ErrorResponse::new(errors.join(" "), "VALIDATION_ERROR");
                response.details = Some(json!({ "errors": errors }));
                (StatusCode::BAD_REQUEST, response)
            }

            AppError::Unauthorized(msg) => {
                tracing::warn!(message = %msg, "Acceso no autorizado");
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new(msg, "UNAUTHORIZED"),
                )
            }

            AppError::Forbidden(msg) => {
                tracing::warn!(message = %msg, "Acceso prohibido");
                (StatusCode::FORBIDDEN, ErrorResponse::new(msg, "FORBIDDEN"))
            }

            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorResponse::new(msg, "NOT_FOUND"))
            }

            AppError::Conflict(fields) => {
                tracing::warn!(?fields, "Conflicto de unicidad");
                let mut response = ErrorResponse::new(
                    format!("The following fields already exist: {}.", fields.join(", ")),
                    "CONFLICT",
                );
                response.details = Some(json!({ "conflicts": fields }));
                (StatusCode::BAD_REQUEST, response)
            }

            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(msg, "BAD_REQUEST"),
            ),

            AppError::RecoverableCompanyNotFound => {
                // La ruta de escape es registrarse como unregistered_driver
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "success": false,
                        "message": "Company not found. Would you like to continue as an unregistered driver?",
                        "canRegisterAsUnregistered": true
                    })),
                )
                    .into_response();
            }

            AppError::IncompleteProfile {
                required_fields,
                completion_endpoint,
            } => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "success": false,
                        "message": "Please complete your company profile first",
                        "requiredFields": required_fields,
                        "completionEndpoint": completion_endpoint
                    })),
                )
                    .into_response();
            }

            AppError::Internal(msg) => {
                tracing::error!(message = %msg, "Error interno");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("An unexpected error occurred.".to_string(), "INTERNAL_ERROR"),
                )
            }

            AppError::RateLimitExceeded => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorResponse::new(
                    "Too many password reset requests. Please try again after 1 day.".to_string(),
                    "RATE_LIMIT_EXCEEDED",
                ),
            ),

            AppError::Jwt(msg) => {
                tracing::warn!(message = %msg, "Error de JWT");
                (StatusCode::UNAUTHORIZED, ErrorResponse::new(msg, "JWT_ERROR"))
            }

            AppError::Hash(msg) => {
                tracing::error!(message = %msg, "Error de hash");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "An error occurred while processing credentials.".to_string(),
                        "HASH_ERROR",
                    ),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Mapear violaciones de índice único a un Conflict con el campo afectado.
    /// Cualquier otro error de sqlx se propaga sin cambios.
    pub fn from_unique_violation(err: sqlx::Error, field: &str) -> AppError {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.code().as_deref() == Some("23505") {
                return AppError::Conflict(vec![field.to_string()]);
            }
        }
        AppError::Database(err)
    }
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str) -> AppError {
    AppError::NotFound(format!("{} not found.", resource))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn conflict_responde_400_con_lista_de_campos() {
        let (status, body) =
            body_json(AppError::Conflict(vec!["email".into(), "phone".into()])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["details"]["conflicts"][0], "email");
        assert_eq!(body["details"]["conflicts"][1], "phone");
    }

    #[tokio::test]
    async fn company_not_found_recuperable_ofrece_alternativa() {
        let (status, body) = body_json(AppError::RecoverableCompanyNotFound).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["canRegisterAsUnregistered"], true);
    }

    #[tokio::test]
    async fn perfil_incompleto_nombra_campos_pendientes() {
        let (status, body) = body_json(AppError::IncompleteProfile {
            required_fields: vec!["bankDetails".into()],
            completion_endpoint: "/api/companies/abc/complete-profile".into(),
        })
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["requiredFields"][0], "bankDetails");
        assert_eq!(body["completionEndpoint"], "/api/companies/abc/complete-profile");
    }

    #[tokio::test]
    async fn validation_list_incluye_todos_los_errores() {
        let (status, body) = body_json(AppError::ValidationList(vec![
            "License plate is required.".into(),
            "Truck brand is required.".into(),
        ]))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["errors"].as_array().unwrap().len(), 2);
    }
}
