//! Domain error types for the instrumentos catalog server.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::{HttpResponse, ResponseError};
use std::fmt;

/// A single field-level validation failure.
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// One or more fields failed validation
    #[error("Validation failed: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Validation(Vec<FieldError>),

    /// Delete blocked by dependent rows
    #[error("{0}")]
    Integrity(String),

    /// Missing or invalid server configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Outbound call to the text-generation service failed
    #[error("External service error: {0}")]
    ExternalService(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        use actix_web::http::StatusCode;

        match self {
            AppError::Database(err_str) => {
                tracing::error!("Database error: {}", err_str);
                HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR).json(ErrorResponse {
                    error: "DATABASE_ERROR".to_string(),
                    message: "An internal database error occurred".to_string(),
                    fields: None,
                })
            }
            AppError::NotFound(_) => {
                HttpResponse::build(StatusCode::NOT_FOUND).json(ErrorResponse {
                    error: "NOT_FOUND".to_string(),
                    message: self.to_string(),
                    fields: None,
                })
            }
            AppError::InvalidInput(_) => {
                HttpResponse::build(StatusCode::BAD_REQUEST).json(ErrorResponse {
                    error: "INVALID_INPUT".to_string(),
                    message: self.to_string(),
                    fields: None,
                })
            }
            AppError::Validation(fields) => {
                HttpResponse::build(StatusCode::UNPROCESSABLE_ENTITY).json(ErrorResponse {
                    error: "VALIDATION_ERROR".to_string(),
                    message: "One or more fields failed validation".to_string(),
                    fields: Some(fields.clone()),
                })
            }
            AppError::Integrity(_) => {
                HttpResponse::build(StatusCode::CONFLICT).json(ErrorResponse {
                    error: "INTEGRITY_ERROR".to_string(),
                    message: self.to_string(),
                    fields: None,
                })
            }
            AppError::Configuration(err_str) => {
                tracing::error!("Configuration error: {}", err_str);
                HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR).json(ErrorResponse {
                    error: "CONFIGURATION_ERROR".to_string(),
                    message: self.to_string(),
                    fields: None,
                })
            }
            AppError::ExternalService(err_str) => {
                tracing::error!("External service error: {}", err_str);
                HttpResponse::build(StatusCode::BAD_GATEWAY).json(ErrorResponse {
                    error: "EXTERNAL_SERVICE_ERROR".to_string(),
                    message: self.to_string(),
                    fields: None,
                })
            }
        }
    }
}

/// Error response body matching the OpenAPI schema.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    /// Field-level detail for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("Invalid UUID: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_collects_field_detail() {
        let err = AppError::Validation(vec![
            FieldError::new("nome", "campo obrigatório"),
            FieldError::new("preco", "deve ser não-negativo"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("nome"));
        assert!(msg.contains("preco"));
    }

    #[test]
    fn not_found_formats_entity_name() {
        let err = AppError::NotFound("Categoria abc".to_string());
        assert_eq!(err.to_string(), "Categoria abc not found");
    }

    #[test]
    fn integrity_message_passes_through() {
        let err = AppError::Integrity(
            "Não é possível excluir uma marca que possui instrumentos vinculados".to_string(),
        );
        assert!(err.to_string().contains("instrumentos vinculados"));
    }
}
