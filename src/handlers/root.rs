use axum::{Json, http::StatusCode};

use crate::models::MessageResponse;
use crate::routes;

/// GET / handler - static informational payload, independent of storage
#[utoipa::path(
    get,
    path = routes::ROOT,
    responses(
        (status = 200, description = "Static informational payload", body = MessageResponse)
    ),
    tag = "configs"
)]
pub async fn root_handler() -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::OK,
        Json(MessageResponse::new("This route does not correspond to any resource.")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_root_returns_static_message() {
        let app = Router::new().route(crate::routes::ROOT, get(root_handler));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let message: MessageResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(message.message, "This route does not correspond to any resource.");
    }
}
