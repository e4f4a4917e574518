//! HTTP mapping for `AppError`.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use mb_core::error::AppError;
use serde_json::json;
use thiserror::Error;

/// Wraps `AppError` so handlers can return it with `?`.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub AppError);

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            AppError::ValidationRejected(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StorageUnreadable { .. }
            | AppError::StorageUnwritable { .. }
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match &self.0 {
            AppError::ValidationRejected(reason) => {
                log::info!("Rejected request: {reason}");
                json!({ "status": "rejected", "reason": reason })
            }
            AppError::NotFound(_) => json!({ "status": "not_found" }),
            other => {
                log::error!("Request failed: {other}");
                json!({ "status": "error", "message": other.to_string() })
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
