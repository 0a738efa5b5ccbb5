//! Error types for the pdfdesk API.
//!
//! Every response body is `{"success": false, "message": ...}` with an
//! optional `detail` field that is suppressed in production. Full errors are
//! always logged server-side regardless of mode.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pdfdesk_convert::ConvertError;
use pdfdesk_core::PdfError;
use pdfdesk_store::StoreError;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

static SHOW_DETAIL: AtomicBool = AtomicBool::new(false);

/// Set once at startup: outside production, 500 responses carry the
/// underlying error text in `detail`.
pub fn set_detail_visibility(show: bool) {
    SHOW_DETAIL.store(show, Ordering::Relaxed);
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("File too large: {0}")]
    TooLarge(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Processing failed: {0}")]
    Processing(String),
}

impl From<PdfError> for ApiError {
    fn from(e: PdfError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<ConvertError> for ApiError {
    fn from(e: ConvertError) -> Self {
        match e {
            ConvertError::NoInput | ConvertError::Decode(_) => {
                ApiError::Validation(e.to_string())
            }
            ConvertError::Encode(_) | ConvertError::Render(_) => {
                ApiError::Processing(e.to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Processing(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            ApiError::TooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone(), None),
            ApiError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                "File not found or expired".to_string(),
                None,
            ),
            ApiError::Processing(msg) => {
                tracing::error!("processing error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Document processing failed".to_string(),
                    Some(msg.clone()),
                )
            }
        };

        let mut body = json!({
            "success": false,
            "message": message,
        });
        if let Some(detail) = detail {
            if SHOW_DETAIL.load(Ordering::Relaxed) {
                body["detail"] = json!(detail);
            }
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(error: ApiError) -> serde_json::Value {
        let response = error.into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_errors_expose_their_message() {
        let body = body_json(ApiError::Validation("Page 11 is out of bounds".into())).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Page 11 is out of bounds");
    }

    #[tokio::test]
    async fn not_found_hides_the_artifact_name() {
        let body = body_json(ApiError::NotFound("20260830_x.pdf".into())).await;
        assert_eq!(body["message"], "File not found or expired");
    }

    #[tokio::test]
    async fn processing_detail_follows_visibility_flag() {
        set_detail_visibility(false);
        let body = body_json(ApiError::Processing("lopdf exploded".into())).await;
        assert!(body.get("detail").is_none());

        set_detail_visibility(true);
        let body = body_json(ApiError::Processing("lopdf exploded".into())).await;
        assert_eq!(body["detail"], "lopdf exploded");
        set_detail_visibility(false);
    }
}
