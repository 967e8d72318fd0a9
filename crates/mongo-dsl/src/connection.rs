//! MongoDB connection setup with pool configuration and environment loading

use std::env;
use std::time::Duration;

use bson::{doc, Document};
use mongo_dsl_common::{DslError, Result};
use mongodb::{
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection, Database,
};
use tracing::{info, warn};

/// Connection pool configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PoolConfig {
    /// Minimum number of connections kept open (default: 5)
    pub min_pool_size: Option<u32>,
    /// Maximum number of connections in the pool (default: 20)
    pub max_pool_size: Option<u32>,
    /// Maximum time a connection can remain idle before being closed (default: none)
    pub max_idle_time: Option<Duration>,
    /// Connection timeout (default: 10s)
    pub connect_timeout: Option<Duration>,
    /// Server selection timeout (default: 30s)
    pub server_selection_timeout: Option<Duration>,
    /// Application name for server logs
    pub app_name: Option<String>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_pool_size: Some(5),
            max_pool_size: Some(20),
            max_idle_time: None,
            connect_timeout: Some(Duration::from_secs(10)),
            server_selection_timeout: Some(Duration::from_secs(30)),
            app_name: Some("mongo-dsl".to_string()),
        }
    }
}

impl PoolConfig {
    fn apply(self, client_options: &mut ClientOptions) {
        if let Some(min) = self.min_pool_size {
            client_options.min_pool_size = Some(min);
        }
        if let Some(max) = self.max_pool_size {
            client_options.max_pool_size = Some(max);
        }
        if let Some(idle) = self.max_idle_time {
            client_options.max_idle_time = Some(idle);
        }
        if let Some(connect) = self.connect_timeout {
            client_options.connect_timeout = Some(connect);
        }
        if let Some(server_sel) = self.server_selection_timeout {
            client_options.server_selection_timeout = Some(server_sel);
        }
        if let Some(app) = self.app_name {
            client_options.app_name = Some(app);
        }
    }
}

/// Everything needed to open a [`Connection`]
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionConfig {
    /// MongoDB connection string
    pub uri: String,
    /// Database to use; falls back to the connection string's default database
    pub database: Option<String>,
    pub pool: PoolConfig,
}

impl ConnectionConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: None,
            pool: PoolConfig::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `MONGODB_URI` is required. `MONGODB_DATABASE`, `MONGODB_MIN_POOL_SIZE`,
    /// `MONGODB_MAX_POOL_SIZE` and `MONGODB_APP_NAME` override the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a caller-supplied variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = lookup("MONGODB_URI")
            .ok_or_else(|| DslError::Configuration("MONGODB_URI is not set".to_string()))?;

        let mut pool = PoolConfig::default();
        if let Some(min) = parse_var(&lookup, "MONGODB_MIN_POOL_SIZE")? {
            pool.min_pool_size = Some(min);
        }
        if let Some(max) = parse_var(&lookup, "MONGODB_MAX_POOL_SIZE")? {
            pool.max_pool_size = Some(max);
        }
        if let Some(app) = lookup("MONGODB_APP_NAME") {
            pool.app_name = Some(app);
        }

        if let (Some(min), Some(max)) = (pool.min_pool_size, pool.max_pool_size) {
            if min > max {
                return Err(DslError::Configuration(format!(
                    "MONGODB_MIN_POOL_SIZE ({}) exceeds MONGODB_MAX_POOL_SIZE ({})",
                    min, max
                )));
            }
        }

        Ok(Self {
            uri,
            database: lookup("MONGODB_DATABASE").filter(|name| !name.is_empty()),
            pool,
        })
    }
}

fn parse_var<F>(lookup: &F, key: &str) -> Result<Option<u32>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|e| {
            DslError::Configuration(format!("{} must be a non-negative integer, got {:?}: {}", key, raw, e))
        }),
    }
}

/// MongoDB connection manager with pooling support
pub struct Connection {
    client: Client,
    database: Database,
}

impl Connection {
    /// Connect with default pool settings to the connection string's default database
    pub async fn new(connection_string: &str) -> Result<Self> {
        Self::with_config(connection_string, PoolConfig::default()).await
    }

    /// Connect with custom pool configuration to the connection string's default database
    pub async fn with_config(connection_string: &str, config: PoolConfig) -> Result<Self> {
        Self::connect(connection_string, config, None).await
    }

    /// Connect using a full [`ConnectionConfig`], e.g. one loaded with
    /// [`ConnectionConfig::from_env`]
    pub async fn from_config(config: ConnectionConfig) -> Result<Self> {
        let ConnectionConfig { uri, database, pool } = config;
        Self::connect(&uri, pool, database.as_deref()).await
    }

    async fn connect(connection_string: &str, pool: PoolConfig, database: Option<&str>) -> Result<Self> {
        let mut client_options = ClientOptions::parse(connection_string).await?;
        pool.apply(&mut client_options);

        // Stable API v1
        let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
        client_options.server_api = Some(server_api);

        let client = Client::with_options(client_options)?;

        let database = match database {
            Some(name) => client.database(name),
            None => client.default_database().ok_or_else(|| {
                DslError::Connection("No default database specified in connection string".to_string())
            })?,
        };

        info!(database = %database.name(), "Connected to MongoDB");

        Ok(Self { client, database })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Untyped collection handle; implements
    /// [`DocumentExecutor`](crate::executor::DocumentExecutor) so builders can run against it
    pub fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection(name)
    }

    /// Check if the connection is healthy by pinging the server
    pub async fn ping(&self) -> Result<bool> {
        match self.database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!(database = %self.database.name(), error = %e, "Ping failed");
                Err(DslError::Connection(format!("Ping failed: {}", e)))
            }
        }
    }

    pub async fn list_collection_names(&self) -> Result<Vec<String>> {
        let names = self.database.list_collection_names().await?;
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_pool_config() {
        let config = PoolConfig::default();
        assert_eq!(config.min_pool_size, Some(5));
        assert_eq!(config.max_pool_size, Some(20));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.server_selection_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.app_name, Some("mongo-dsl".to_string()));
    }

    #[test]
    fn test_pool_config_applies_to_client_options() {
        let mut options = ClientOptions::default();
        PoolConfig {
            min_pool_size: Some(2),
            max_pool_size: Some(50),
            max_idle_time: Some(Duration::from_secs(300)),
            connect_timeout: None,
            server_selection_timeout: Some(Duration::from_secs(5)),
            app_name: Some("my-app".to_string()),
        }
        .apply(&mut options);

        assert_eq!(options.min_pool_size, Some(2));
        assert_eq!(options.max_pool_size, Some(50));
        assert_eq!(options.max_idle_time, Some(Duration::from_secs(300)));
        assert_eq!(options.connect_timeout, None);
        assert_eq!(options.server_selection_timeout, Some(Duration::from_secs(5)));
        assert_eq!(options.app_name, Some("my-app".to_string()));
    }

    #[test]
    fn test_connection_config_new() {
        let config = ConnectionConfig::new("mongodb://localhost:27017/app");
        assert_eq!(config.uri, "mongodb://localhost:27017/app");
        assert_eq!(config.database, None);
        assert_eq!(config.pool, PoolConfig::default());
    }

    #[test]
    fn test_from_vars_requires_uri() {
        let err = ConnectionConfig::from_vars(vars(&[])).unwrap_err();
        assert!(matches!(err, DslError::Configuration(_)));
        assert!(err.is_setup_error());
    }

    #[test]
    fn test_from_vars_defaults() {
        let config = ConnectionConfig::from_vars(vars(&[("MONGODB_URI", "mongodb://localhost")])).unwrap();
        assert_eq!(config.uri, "mongodb://localhost");
        assert_eq!(config.database, None);
        assert_eq!(config.pool, PoolConfig::default());
    }

    #[test]
    fn test_from_vars_overrides() {
        let config = ConnectionConfig::from_vars(vars(&[
            ("MONGODB_URI", "mongodb://db:27017"),
            ("MONGODB_DATABASE", "shop"),
            ("MONGODB_MIN_POOL_SIZE", "1"),
            ("MONGODB_MAX_POOL_SIZE", " 8 "),
            ("MONGODB_APP_NAME", "shop-api"),
        ]))
        .unwrap();

        assert_eq!(config.database.as_deref(), Some("shop"));
        assert_eq!(config.pool.min_pool_size, Some(1));
        assert_eq!(config.pool.max_pool_size, Some(8));
        assert_eq!(config.pool.app_name.as_deref(), Some("shop-api"));
    }

    #[test]
    fn test_from_vars_empty_database_is_ignored() {
        let config = ConnectionConfig::from_vars(vars(&[
            ("MONGODB_URI", "mongodb://localhost"),
            ("MONGODB_DATABASE", ""),
        ]))
        .unwrap();
        assert_eq!(config.database, None);
    }

    #[test]
    fn test_from_vars_rejects_bad_pool_size() {
        let err = ConnectionConfig::from_vars(vars(&[
            ("MONGODB_URI", "mongodb://localhost"),
            ("MONGODB_MAX_POOL_SIZE", "lots"),
        ]))
        .unwrap_err();
        match err {
            DslError::Configuration(msg) => assert!(msg.contains("MONGODB_MAX_POOL_SIZE")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_vars_rejects_inverted_pool_bounds() {
        let err = ConnectionConfig::from_vars(vars(&[
            ("MONGODB_URI", "mongodb://localhost"),
            ("MONGODB_MIN_POOL_SIZE", "30"),
        ]))
        .unwrap_err();
        assert!(matches!(err, DslError::Configuration(_)));
    }
}
