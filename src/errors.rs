use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Request failure. Every handler returns at most one of these; the body is always
/// `{"detail": "..."}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{context}: {source}")]
    Internal {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn internal(context: &'static str, source: impl Into<anyhow::Error>) -> Self {
        AppError::Internal { context, source: source.into() }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Rejected request: {msg}");
                StatusCode::BAD_REQUEST
            }
            AppError::Internal { .. } => {
                tracing::error!("Internal error: {self:?}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use pretty_assertions::assert_eq;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn bad_request_is_400_with_detail() {
        let (status, body) = body_of(AppError::BadRequest("File must be an image".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "detail": "File must be an image" }));
    }

    #[tokio::test]
    async fn internal_is_500_and_carries_fault_message() {
        let err = AppError::internal("Error processing image", anyhow::anyhow!("worker panicked"));
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "detail": "Error processing image: worker panicked" }));
    }
}
