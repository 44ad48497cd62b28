use anyhow::{Context, Result};
use gcloud_gax::grpc::Code;
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::client::{Client, ClientConfig};
use gcloud_spanner::mutation::insert_or_update;
use gcloud_spanner::statement::Statement;
use gcloud_spanner::value::CommitTimestamp;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::config::Settings;

/// Table holding one row per storage key. The whole config collection lives
/// in a single row, so the table normally has exactly one.
const TABLE: &str = "config_store";

/// Shareable key-value client for use across async handlers.
///
/// Spanner is used strictly as an opaque `get(key)` / `put(key, value)`
/// service: a string primary key and a JSON `data` column. Nothing here
/// knows about the shape of the stored value.
#[derive(Clone)]
pub struct KvStore {
    inner: Arc<Client>,
}

impl KvStore {
    /// Create a new store client from the service settings.
    ///
    /// The gcloud-spanner library automatically detects the
    /// SPANNER_EMULATOR_HOST environment variable and connects to the
    /// emulator when set, or production Spanner otherwise.
    ///
    /// Also performs auto-provisioning: the instance, database, and table
    /// are created if they don't exist. The table is only ever created
    /// empty; no storage key is seeded.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        auto_provision(settings).await?;

        let database_path = format!(
            "projects/{}/instances/{}/databases/{}",
            settings.spanner_project, settings.spanner_instance, settings.spanner_database
        );

        match &settings.spanner_emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        // ClientConfig::default() automatically uses SPANNER_EMULATOR_HOST if set
        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!("Successfully connected to Spanner database: {}", database_path);

        Ok(Self { inner: Arc::new(client) })
    }

    /// Read the value stored under `key`.
    ///
    /// # Returns
    /// * `Ok(Some(value))` - Key present, value returned
    /// * `Ok(None)` - Key has never been written
    /// * `Err(_)` - Storage unreachable or stored text is not valid JSON
    pub async fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        let key_str = key.to_string();
        let mut statement =
            Statement::new(format!("SELECT data FROM {TABLE} WHERE id = @id"));
        statement.add_param("id", &key_str);

        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query value from Spanner")?;

        if let Some(row) = result_set.next().await? {
            let data_str: String = row.column_by_name("data")?;
            let value: JsonValue = serde_json::from_str(&data_str)
                .context("Failed to deserialize stored JSON value")?;

            tracing::debug!("Read value under key: {}", key);
            Ok(Some(value))
        } else {
            tracing::debug!("No value under key: {}", key);
            Ok(None)
        }
    }

    /// Write `value` under `key`, replacing whatever was there.
    ///
    /// `created_at` and `updated_at` are set to the commit timestamp
    /// automatically.
    ///
    /// # Errors
    /// Returns an error if serialization or the Spanner write fails
    pub async fn put(&self, key: &str, value: &JsonValue) -> Result<()> {
        let key_str = key.to_string();
        let data_str = serde_json::to_string(value).context("Failed to serialize JSON value")?;

        let mutation = insert_or_update(
            TABLE,
            &["id", "data", "created_at", "updated_at"],
            &[&key_str, &data_str, &CommitTimestamp::new(), &CommitTimestamp::new()],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to write value to Spanner")?;

        tracing::debug!("Wrote value under key: {}", key);
        Ok(())
    }

    /// Perform a health check by executing a simple query (SELECT 1).
    ///
    /// # Returns
    /// * `Ok(())` - Storage is reachable and responsive
    /// * `Err(_)` - Connection failed or query failed
    pub async fn health_check(&self) -> Result<()> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute health check query")?;

        if result_set.next().await?.is_some() {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results"))
        }
    }
}

/// Automatically provision the Spanner instance, database, and table.
///
/// Checks whether the configured resources exist and creates them if needed,
/// so local development against the emulator requires zero setup.
async fn auto_provision(settings: &Settings) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin_client = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    let project_path = format!("projects/{}", settings.spanner_project);
    let instance_path = format!("{}/instances/{}", project_path, settings.spanner_instance);
    let database_path = format!("{}/databases/{}", instance_path, settings.spanner_database);

    ensure_instance_exists(&admin_client, settings, &project_path, &instance_path).await?;
    ensure_database_exists(&admin_client, &instance_path, &database_path).await?;
    ensure_table_exists(&admin_client, &database_path).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

/// Ensure the Spanner instance exists, creating it if necessary
async fn ensure_instance_exists(
    admin_client: &AdminClient,
    settings: &Settings,
    project_path: &str,
    instance_path: &str,
) -> Result<()> {
    let get_request = GetInstanceRequest {
        name: instance_path.to_string(),
        field_mask: None,
    };

    match admin_client.instance().get_instance(get_request, None).await {
        Ok(_) => {
            tracing::info!("Instance already exists: {}", instance_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Instance not found, creating: {}", instance_path);

            let instance_config = if settings.spanner_emulator_host.is_some() {
                format!("{}/instanceConfigs/emulator-config", project_path)
            } else {
                format!("{}/instanceConfigs/regional-us-central1", project_path)
            };

            let create_request = CreateInstanceRequest {
                parent: project_path.to_string(),
                instance_id: settings.spanner_instance.clone(),
                instance: Some(Instance {
                    name: instance_path.to_string(),
                    config: instance_config,
                    display_name: format!("{} instance", settings.spanner_instance),
                    node_count: 1,
                    ..Default::default()
                }),
            };

            let mut operation = admin_client
                .instance()
                .create_instance(create_request, None)
                .await
                .context("Failed to start instance creation")?;

            operation.wait(None).await.context("Failed to create instance")?;

            tracing::info!("Instance created successfully: {}", instance_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check instance existence: {}",
            e.message()
        )),
    }
}

/// Ensure the Spanner database exists, creating it if necessary
async fn ensure_database_exists(
    admin_client: &AdminClient,
    instance_path: &str,
    database_path: &str,
) -> Result<()> {
    let get_request = GetDatabaseRequest {
        name: database_path.to_string(),
    };

    match admin_client.database().get_database(get_request, None).await {
        Ok(_) => {
            tracing::info!("Database already exists: {}", database_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Database not found, creating: {}", database_path);

            let database_id = database_path
                .split('/')
                .next_back()
                .context("Invalid database path")?;

            let create_request = CreateDatabaseRequest {
                parent: instance_path.to_string(),
                create_statement: format!("CREATE DATABASE `{}`", database_id),
                extra_statements: vec![],
                encryption_config: None,
                database_dialect: 1, // Google Standard SQL
                proto_descriptors: vec![],
            };

            let mut operation = admin_client
                .database()
                .create_database(create_request, None)
                .await
                .context("Failed to start database creation")?;

            operation.wait(None).await.context("Failed to create database")?;

            tracing::info!("Database created successfully: {}", database_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check database existence: {}",
            e.message()
        )),
    }
}

/// Ensure the key-value table exists, creating it if necessary
async fn ensure_table_exists(admin_client: &AdminClient, database_path: &str) -> Result<()> {
    let get_ddl_request = GetDatabaseDdlRequest {
        database: database_path.to_string(),
    };

    let ddl_response = admin_client
        .database()
        .get_database_ddl(get_ddl_request, None)
        .await
        .context("Failed to get database DDL")?;

    let table_exists = ddl_response.into_inner().statements.iter().any(|stmt| {
        stmt.contains(&format!("CREATE TABLE {TABLE}"))
            || stmt.contains(&format!("CREATE TABLE `{TABLE}`"))
    });

    if table_exists {
        tracing::info!("Table '{}' already exists", TABLE);
        Ok(())
    } else {
        tracing::info!("Table '{}' not found, creating...", TABLE);

        let create_table_ddl = format!(
            "CREATE TABLE {TABLE} (\n    \
                id STRING(64) NOT NULL,\n    \
                data JSON NOT NULL,\n    \
                created_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),\n    \
                updated_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),\n\
            ) PRIMARY KEY (id)"
        );

        let update_request = UpdateDatabaseDdlRequest {
            database: database_path.to_string(),
            statements: vec![create_table_ddl],
            operation_id: String::new(),
            proto_descriptors: vec![],
            throughput_mode: false,
        };

        let mut operation = admin_client
            .database()
            .update_database_ddl(update_request, None)
            .await
            .context("Failed to start table creation")?;

        operation.wait(None).await.context("Failed to create table")?;

        tracing::info!("Table '{}' created successfully", TABLE);
        Ok(())
    }
}

/// Test-only settings pointing at the emulator, with an isolated database
/// per caller. Returns None when SPANNER_EMULATOR_HOST is not exported.
#[cfg(test)]
pub(crate) fn emulator_settings(instance: &str, database: &str) -> Option<Settings> {
    let host = std::env::var("SPANNER_EMULATOR_HOST").ok()?;

    Some(Settings {
        spanner_emulator_host: Some(host),
        spanner_project: "test-project".to_string(),
        spanner_instance: instance.to_string(),
        spanner_database: database.to_string(),
        service_port: 3000,
        service_host: "0.0.0.0".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Connects to the emulator, provisioning an isolated database. Returns
    /// None (test skipped) when no emulator is reachable.
    async fn emulator_store(instance: &str, database: &str) -> Option<KvStore> {
        let settings = emulator_settings(instance, database)?;

        match KvStore::from_settings(&settings).await {
            Ok(store) => Some(store),
            Err(e) => {
                println!("emulator not reachable, skipping: {e:#}");
                None
            }
        }
    }

    #[test]
    fn test_store_is_clonable() {
        // Clone is required for sharing across Axum handlers
        fn assert_clone<T: Clone>() {}
        assert_clone::<KvStore>();
    }

    #[test]
    fn test_store_is_send_sync() {
        // Send + Sync are required for use in async handlers
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<KvStore>();
    }

    #[tokio::test]
    async fn test_get_missing_key_returns_none() {
        let Some(store) = emulator_store("kv-missing-instance", "kv-missing-db").await else {
            return;
        };

        let value = store.get("never-written").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips() {
        let Some(store) = emulator_store("kv-roundtrip-instance", "kv-roundtrip-db").await else {
            return;
        };

        let value = serde_json::json!([
            {"id": "a", "name": "First", "visible": [], "editable": [], "blank": []}
        ]);

        store.put("configs", &value).await.unwrap();
        let read_back = store.get("configs").await.unwrap();
        assert_eq!(read_back, Some(value.clone()));

        // put replaces wholesale
        let replacement = serde_json::json!([]);
        store.put("configs", &replacement).await.unwrap();
        let read_back = store.get("configs").await.unwrap();
        assert_eq!(read_back, Some(replacement));
    }

    #[tokio::test]
    async fn test_provisioning_is_idempotent() {
        if emulator_store("kv-idempotent-instance", "kv-idempotent-db").await.is_none() {
            return;
        }

        let second = emulator_store("kv-idempotent-instance", "kv-idempotent-db").await;
        assert!(second.is_some(), "second provisioning pass should succeed");
    }

    #[tokio::test]
    async fn test_health_check() {
        let Some(store) = emulator_store("kv-health-instance", "kv-health-db").await else {
            return;
        };

        store.health_check().await.unwrap();
    }
}
