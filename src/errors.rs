use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use derive_more::Display;
use serde::Serialize;
use validator::ValidationErrors;

/// Message returned to clients whenever storage fails. The detail only goes to the logs.
pub const STORAGE_FAILURE_MESSAGE: &str = "Database error occurred";

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    MethodNotAllowed,
    RateLimited(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::MethodNotAllowed => write!(f, "Method not allowed"),
            AppError::RateLimited(msg) => write!(f, "Rate limited: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl AppError {
    /// The message safe to show to a client.
    pub fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::RateLimited(msg) => msg.clone(),
            AppError::MethodNotAllowed => "Method not allowed".to_string(),
            AppError::InternalError(_) => STORAGE_FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    fn log(&self) {
        if let AppError::InternalError(detail) = self {
            tracing::error!(error = %detail, "Request failed with an internal error");
        }
    }
}

/// Read-side failure body: `{success: false, error}`.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
}

/// Write-side failure body: `{success: false, message}`.
#[derive(Debug, Serialize)]
pub struct MessageEnvelope {
    pub success: bool,
    pub message: String,
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        self.log();
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(ErrorEnvelope {
                success: false,
                error: self.public_message(),
            })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Wraps an [`AppError`] raised by a write endpoint, which reports failures under `message`.
#[derive(Debug, Display)]
#[display("{_0}")]
pub struct WriteError(pub AppError);

impl From<AppError> for WriteError {
    fn from(err: AppError) -> Self {
        WriteError(err)
    }
}

impl ResponseError for WriteError {
    fn error_response(&self) -> HttpResponse {
        self.0.log();
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(MessageEnvelope {
                success: false,
                message: self.0.public_message(),
            })
    }

    fn status_code(&self) -> StatusCode {
        self.0.status_code()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .into_iter()
            .flat_map(|(_, errors)| errors.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid value".to_string());

        AppError::ValidationError(message)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref e) if e.is_unique_violation() => {
                AppError::Conflict("Duplicate entry".into())
            }
            sqlx::Error::Database(ref e) if e.is_foreign_key_violation() => {
                AppError::Conflict("Foreign key violation".into())
            }
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::InternalError(format!("Database error: {}", err)),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}
