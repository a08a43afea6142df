use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{area}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Event and organization errors
/// - E2xxx: Task and volunteer errors
/// - E3xxx: Report and export errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    ServiceUnavailable,

    // Events (E1xxx)
    EventNotFound,
    OrganizationNotFound,

    // Tasks (E2xxx)
    VolunteerRequired,

    // Reports (E3xxx)
    TemplateUnavailable,
    ExportFailed,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::ServiceUnavailable => "E0005",

            // Events
            Self::EventNotFound => "E1001",
            Self::OrganizationNotFound => "E1002",

            // Tasks
            Self::VolunteerRequired => "E2001",

            // Reports
            Self::TemplateUnavailable => "E3002",
            Self::ExportFailed => "E3003",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError | Self::TemplateUnavailable | Self::ExportFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::ValidationError | Self::VolunteerRequired => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::EventNotFound | Self::OrganizationNotFound => {
                StatusCode::NOT_FOUND
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    /// The error code this error answers with, if it carries one.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            AppError::Known { code, .. } => Some(*code),
            AppError::Validation(_) => Some(ErrorCode::ValidationError),
            AppError::Database(diesel::result::Error::NotFound) => Some(ErrorCode::NotFound),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, error_response) = match &self {
            AppError::Known { code, message, details } => {
                let mut resp = ApiErrorResponse::new(code.code(), message);
                if let Some(d) = details {
                    resp = resp.with_details(d.clone());
                }
                (*code, resp)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                let code = ErrorCode::InternalError;
                (code, ApiErrorResponse::new(code.code(), "internal server error"))
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                match err {
                    diesel::result::Error::NotFound => {
                        let code = ErrorCode::NotFound;
                        (code, ApiErrorResponse::new(code.code(), "resource not found"))
                    }
                    _ => {
                        let code = ErrorCode::InternalError;
                        (code, ApiErrorResponse::new(code.code(), "database error"))
                    }
                }
            }
            AppError::Validation(msg) => {
                let code = ErrorCode::ValidationError;
                (code, ApiErrorResponse::new(code.code(), msg))
            }
        };

        (code.status_code(), Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

// --- Tests ---
