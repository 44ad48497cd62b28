pub mod create;
pub mod delete;
pub mod health;
pub mod list;
pub mod root;
pub mod update;

pub use create::create_handler;
pub use delete::delete_handler;
pub use health::health_handler;
pub use list::list_handler;
pub use root::root_handler;
pub use update::update_handler;

use crate::error::{ApiError, WriteOp};
use crate::models::{self, Config};
use crate::state::AppState;

/// Fetch and deserialize the whole collection from under the configs key.
pub(crate) async fn fetch_collection(state: &AppState) -> Result<Vec<Config>, ApiError> {
    let value = state
        .store
        .get(models::CONFIGS_KEY)
        .await
        .map_err(ApiError::Fetch)?
        .ok_or(ApiError::CollectionMissing)?;

    serde_json::from_value(value).map_err(|e| ApiError::Fetch(e.into()))
}

/// Serialize and write the whole collection back under the same key.
pub(crate) async fn persist_collection(
    state: &AppState,
    configs: &[Config],
    op: WriteOp,
) -> Result<(), ApiError> {
    let value = serde_json::to_value(configs).map_err(|e| ApiError::Write(op, e.into()))?;

    state
        .store
        .put(models::CONFIGS_KEY, &value)
        .await
        .map_err(|e| ApiError::Write(op, e))
}
