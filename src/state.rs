use crate::config::Settings;
use crate::spanner::KvStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: KvStore,
    pub settings: Arc<Settings>,
    /// Serializes read-modify-write cycles against the configs key. Without
    /// it, two concurrent mutations each rewrite the whole collection and
    /// the last write silently drops the other's change.
    pub write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: KvStore, settings: Settings) -> Self {
        Self {
            store,
            settings: Arc::new(settings),
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}
