use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{area}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    ValidationError,
    BadRequest,
    StorageError,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ValidationError => "E0002",
            Self::BadRequest => "E0008",
            Self::StorageError => "E0010",
        }
    }

    /// The public contract reports every failure as a 400; clients tell the
    /// kinds apart through `code` and the message only.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError | Self::BadRequest | Self::StorageError => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
    },

    #[error("{0}")]
    Database(#[from] diesel::result::Error),

    #[error("{0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("{0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Known { code, .. } => *code,
            Self::Database(_) | Self::Pool(_) => ErrorCode::StorageError,
            Self::Validation(_) => ErrorCode::ValidationError,
        }
    }

    /// Prefix the message with the operation that failed, keeping the code.
    ///
    /// `AppError::validation("x").context("Erro ao adicionar dados")` renders
    /// as `Erro ao adicionar dados: x`.
    pub fn context(self, operation: &str) -> Self {
        Self::Known {
            code: self.code(),
            message: format!("{operation}: {self}"),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let message = self.to_string();

        match code {
            ErrorCode::StorageError => {
                tracing::error!(code = code.code(), error = %message, "storage error");
            }
            ErrorCode::ValidationError | ErrorCode::BadRequest => {
                tracing::warn!(code = code.code(), error = %message, "request rejected");
            }
        }

        let body = ApiErrorResponse::new(code.code(), message);
        (code.status_code(), Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
