use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{error::DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Error body returned by every failing endpoint.
///
/// `error` carries the raw detail and is only populated for server-side
/// failures, mirroring the `{message, error}` shape clients already parse.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidFormat(String),

    #[error("Email or Phone already exists")]
    DuplicateContact,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Painting not found: {0}")]
    PaintingNotFound(String),

    #[error("Invalid password")]
    InvalidPassword,

    #[error("{0}")]
    InvalidTransition(String),

    #[error("All required fields must be provided.")]
    MissingField,

    #[error("{0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(DbErr),

    #[error("Hash error: {0}")]
    HashError(String),

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::DuplicateContact,
            _ => ServiceError::DatabaseError(err),
        }
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::ValidationError(rejection.body_text())
    }
}

impl From<jsonwebtoken::errors::Error> for ServiceError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ServiceError::TokenError(err.to_string())
    }
}

impl ServiceError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        ServiceError::NotFound(entity.into())
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) | Self::PaintingNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidFormat(_)
            | Self::DuplicateContact
            | Self::InvalidPassword
            | Self::InvalidTransition(_)
            | Self::MissingField
            | Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::DatabaseError(_)
            | Self::HashError(_)
            | Self::TokenError(_)
            | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Returns the error message suitable for HTTP responses.
    /// Server-side failures get a generic message; the detail travels in `error`.
    pub fn response_message(&self) -> String {
        if self.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = if self.is_server_error() {
            error!(error = %self, "request failed");
            Some(self.to_string())
        } else {
            None
        };

        let body = ErrorResponse {
            message: self.response_message(),
            error: detail,
        };

        (status, Json(body)).into_response()
    }
}
