use serde::{Deserialize, Serialize};

/// Storage key the whole collection is persisted under.
pub const CONFIGS_KEY: &str = "configs";

/// One configuration record.
///
/// `id` is supplied by the client and is never checked for uniqueness, so
/// duplicates can exist; update and delete act on every matching record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Config {
    pub id: String,
    pub name: String,
    pub visible: Vec<String>,
    pub editable: Vec<String>,
    pub blank: Vec<String>,
}

/// Partial update body for PUT. Fields left out of the request keep their
/// stored value; fields present in the request, `id` included, overwrite it.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct ConfigPatch {
    pub id: Option<String>,
    pub name: Option<String>,
    pub visible: Option<Vec<String>>,
    pub editable: Option<Vec<String>>,
    pub blank: Option<Vec<String>>,
}

impl ConfigPatch {
    /// Shallow-merges the patch into `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(id) = &self.id {
            config.id = id.clone();
        }
        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if let Some(visible) = &self.visible {
            config.visible = visible.clone();
        }
        if let Some(editable) = &self.editable {
            config.editable = editable.clone();
        }
        if let Some(blank) = &self.blank {
            config.blank = blank.clone();
        }
    }
}

/// Removes every record whose `id` equals `id`, keeping the relative order
/// of everything else. Removing an id that is not present is a no-op.
pub fn remove_by_id(configs: Vec<Config>, id: &str) -> Vec<Config> {
    configs.into_iter().filter(|config| config.id != id).collect()
}

/// Merges `patch` into every record whose `id` equals `id`. Records with a
/// different id pass through untouched, as does the whole collection when
/// nothing matches.
pub fn merge_by_id(configs: &mut [Config], id: &str, patch: &ConfigPatch) {
    for config in configs.iter_mut().filter(|config| config.id == id) {
        patch.apply(config);
    }
}

/// Response body shared by the root route and all mutation successes.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self { message: message.to_string() }
    }
}
