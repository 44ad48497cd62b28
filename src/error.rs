use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Error response body shared by all endpoints.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// The write that was in flight when storage failed. Picks the user-facing
/// wording, which is fixed per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Save,
    Delete,
    Update,
}

impl WriteOp {
    fn message(self) -> &'static str {
        match self {
            // "occured" is the wording clients already match on
            WriteOp::Save => "An error occured while saving the config. Try again",
            WriteOp::Delete => "An error occurred while deleting the config. Try again",
            WriteOp::Update => "An error occurred while updating the config. Try again",
        }
    }
}

const FETCH_MESSAGE: &str = "An error occurred while getting the configs. Try again";

/// Custom error type for API endpoints
///
/// A closed set of failure kinds, each mapped to one status code and one
/// client-facing message. Underlying causes are logged, never returned.
#[derive(Debug)]
pub enum ApiError {
    /// The configs key has never been populated
    CollectionMissing,
    /// Storage read failed, or the stored value did not parse as a collection
    Fetch(anyhow::Error),
    /// Storage write failed while persisting the collection
    Write(WriteOp, anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::CollectionMissing => {
                tracing::warn!("configs key has never been populated");
                (StatusCode::NOT_FOUND, FETCH_MESSAGE)
            }
            ApiError::Fetch(err) => {
                tracing::error!("failed to fetch configs: {:#}", err);
                (StatusCode::SERVICE_UNAVAILABLE, FETCH_MESSAGE)
            }
            ApiError::Write(op, err) => {
                tracing::error!("failed to persist configs ({:?}): {:#}", op, err);
                (StatusCode::SERVICE_UNAVAILABLE, op.message())
            }
        };

        let body = Json(ErrorResponse {
            error: error_message.to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_collection_missing_maps_to_not_found() {
        let response = ApiError::CollectionMissing.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_of(response).await;
        assert_eq!(body.error, "An error occurred while getting the configs. Try again");
    }

    #[tokio::test]
    async fn test_fetch_failure_maps_to_service_unavailable() {
        let response = ApiError::Fetch(anyhow::anyhow!("connection refused")).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = body_of(response).await;
        // the underlying cause is never surfaced to the client
        assert_eq!(body.error, "An error occurred while getting the configs. Try again");
    }

    #[tokio::test]
    async fn test_write_failure_wording_is_per_operation() {
        let cases = [
            (WriteOp::Save, "An error occured while saving the config. Try again"),
            (WriteOp::Delete, "An error occurred while deleting the config. Try again"),
            (WriteOp::Update, "An error occurred while updating the config. Try again"),
        ];

        for (op, expected) in cases {
            let response = ApiError::Write(op, anyhow::anyhow!("deadline exceeded")).into_response();
            assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(body_of(response).await.error, expected);
        }
    }
}
