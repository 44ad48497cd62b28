use crate::error::{ApiError, ErrorResponse};
use crate::handlers::fetch_collection;
use crate::models::Config;
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};

/// GET /configs handler - return the stored collection as a raw JSON array
#[utoipa::path(
    get,
    path = routes::CONFIGS,
    responses(
        (status = 200, description = "The full config collection", body = [Config]),
        (status = 404, description = "The collection has never been populated", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    ),
    tag = "configs"
)]
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<Config>>), ApiError> {
    let configs = fetch_collection(&state).await?;

    tracing::debug!(count = configs.len(), "listed configs");
    Ok((StatusCode::OK, Json(configs)))
}
