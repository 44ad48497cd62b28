use crate::error::{ApiError, ErrorResponse, WriteOp};
use crate::handlers::{fetch_collection, persist_collection};
use crate::models::{self, ConfigPatch, MessageResponse};
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::Path, extract::State, http::StatusCode};

/// PUT /configs/:id handler - merge a partial config into every match
///
/// Fields present in the body, `id` included, overwrite the stored record;
/// absent fields are preserved. An id with no matches is a no-op that still
/// reports success.
#[utoipa::path(
    put,
    path = routes::CONFIG_ITEM,
    params(
        ("id" = String, Path, description = "Config id to update; every matching record is rewritten")
    ),
    request_body = ConfigPatch,
    responses(
        (status = 200, description = "Update persisted", body = MessageResponse),
        (status = 404, description = "The collection has never been populated", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    ),
    tag = "configs"
)]
pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ConfigPatch>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let _guard = state.write_lock.lock().await;

    let mut configs = fetch_collection(&state).await?;
    models::merge_by_id(&mut configs, &id, &patch);
    persist_collection(&state, &configs, WriteOp::Update).await?;

    tracing::info!(%id, "config update persisted");
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Config updated successfully")),
    ))
}
