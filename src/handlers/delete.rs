use crate::error::{ApiError, ErrorResponse, WriteOp};
use crate::handlers::{fetch_collection, persist_collection};
use crate::models::{self, MessageResponse};
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::Path, extract::State, http::StatusCode};

/// DELETE /configs/:id handler - remove every record with the given id
///
/// An id with no matches persists the collection unchanged and still
/// reports success.
#[utoipa::path(
    delete,
    path = routes::CONFIG_ITEM,
    params(
        ("id" = String, Path, description = "Config id to delete; every matching record is removed")
    ),
    responses(
        (status = 200, description = "Delete persisted", body = MessageResponse),
        (status = 404, description = "The collection has never been populated", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    ),
    tag = "configs"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let _guard = state.write_lock.lock().await;

    let configs = fetch_collection(&state).await?;
    let before = configs.len();
    let configs = models::remove_by_id(configs, &id);
    persist_collection(&state, &configs, WriteOp::Delete).await?;

    tracing::info!(%id, removed = before - configs.len(), "config delete persisted");
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Config deleted successfully")),
    ))
}
