use crate::error::{ApiError, ErrorResponse, WriteOp};
use crate::handlers::{fetch_collection, persist_collection};
use crate::models::{Config, MessageResponse};
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};

/// POST /configs handler - append one config
///
/// The body is appended as the last element of the collection, even when
/// its `id` collides with an existing record.
#[utoipa::path(
    post,
    path = routes::CONFIGS,
    request_body = Config,
    responses(
        (status = 200, description = "Config appended", body = MessageResponse),
        (status = 404, description = "The collection has never been populated", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    ),
    tag = "configs"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    Json(config): Json<Config>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let _guard = state.write_lock.lock().await;

    let mut configs = fetch_collection(&state).await?;
    configs.push(config);
    persist_collection(&state, &configs, WriteOp::Save).await?;

    tracing::info!(total = configs.len(), "config appended");
    Ok((StatusCode::OK, Json(MessageResponse::new("ok"))))
}
