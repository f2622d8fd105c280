use actix_web::{error::JsonPayloadError, web};
use tracing::warn;

use crate::errors::{AppError, WriteError};

pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON input";

/// Unreadable write bodies answer 400 with the write-side envelope.
///
/// The content type is not enforced: admin forms post JSON without always declaring it.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .content_type_required(false)
            .error_handler(|err, _req| WriteError::from(JsonError::from(err)).into()),
    );
}

#[derive(Debug)]
pub struct JsonError {
    detail: String,
}

impl From<JsonPayloadError> for JsonError {
    fn from(err: JsonPayloadError) -> Self {
        JsonError {
            detail: format!("JSON payload error: {}", err),
        }
    }
}

impl From<JsonError> for WriteError {
    fn from(err: JsonError) -> Self {
        warn!(detail = %err.detail, "Rejected write body");
        WriteError(AppError::BadRequest(INVALID_JSON_MESSAGE.to_string()))
    }
}
