use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::store::StoreError;

/// Errors a handler can surface. Validation and not-found map straight
/// to their status codes with a Turkish message; store faults become a
/// 500 with a generic message, the detail showing only in debug builds.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn missing(field: &str) -> ApiError {
        ApiError::Validation(format!("{field} gerekli"))
    }

    pub fn order_not_found() -> ApiError {
        ApiError::NotFound("Sipariş bulunamadı".into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApiError::Validation(message) | ApiError::NotFound(message) => {
                warn!(status = status.as_u16(), message, "request refused");
                message.clone()
            }
            ApiError::Store(store_error) => {
                error!(%store_error, "request failed");
                "Beklenmeyen bir hata oluştu".to_string()
            }
        };
        let mut body = json!({ "success": false, "error": message });
        if cfg!(debug_assertions) {
            if let ApiError::Store(store_error) = &self {
                body["detail"] = json!(store_error.to_string());
            }
        }
        (status, Json(body)).into_response()
    }
}
