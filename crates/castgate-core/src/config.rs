//! Configuration for the CastGate gateway.
//!
//! All configuration is driven by environment variables.

use std::env;

/// Which store backend the server uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// In-process tables, optionally seeded from a JSON file.
    #[default]
    Memory,
    /// A DynamoDB table service.
    DynamoDb,
}

impl StoreBackend {
    /// Parse a backend name. Unknown names fall back to the memory backend.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("dynamodb") {
            Self::DynamoDb
        } else {
            Self::Memory
        }
    }
}

/// The three tables the lookup touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Table queried with the crew-rank threshold condition (`TABLE_NAME`).
    pub rank_table: String,
    /// Table holding movie records (`MOVIES_TABLE_NAME`).
    pub movies_table: String,
    /// Table queried for the full cast (`CREW_TABLE_NAME`).
    pub crew_table: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            rank_table: "movie-crew-ranks".to_owned(),
            movies_table: "movies".to_owned(),
            crew_table: "movie-crew".to_owned(),
        }
    }
}

impl TableConfig {
    /// Load table names from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut tables = Self::default();
        if let Ok(v) = env::var("TABLE_NAME") {
            tables.rank_table = v;
        }
        if let Ok(v) = env::var("MOVIES_TABLE_NAME") {
            tables.movies_table = v;
        }
        if let Ok(v) = env::var("CREW_TABLE_NAME") {
            tables.crew_table = v;
        }
        tables
    }
}

/// Global configuration for the gateway server.
#[derive(Debug, Clone)]
pub struct CastGateConfig {
    /// Bind address for the gateway.
    pub gateway_listen: String,
    /// Default AWS region for the DynamoDB backend.
    pub default_region: String,
    /// Log level filter (overridden by `RUST_LOG`).
    pub log_level: String,
    /// Selected store backend.
    pub store_backend: StoreBackend,
    /// Seed file path for the memory backend.
    pub seed_data: Option<String>,
    /// Endpoint override for the DynamoDB backend.
    pub dynamodb_endpoint: Option<String>,
    /// Table names.
    pub tables: TableConfig,
}

impl Default for CastGateConfig {
    fn default() -> Self {
        Self {
            gateway_listen: "0.0.0.0:9321".to_owned(),
            default_region: "us-east-1".to_owned(),
            log_level: "info".to_owned(),
            store_backend: StoreBackend::Memory,
            seed_data: None,
            dynamodb_endpoint: None,
            tables: TableConfig::default(),
        }
    }
}

impl CastGateConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = env::var("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Ok(v) = env::var("DEFAULT_REGION") {
            config.default_region = v;
        }
        if let Ok(v) = env::var("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Ok(v) = env::var("STORE_BACKEND") {
            config.store_backend = StoreBackend::from_name(&v);
        }
        if let Ok(v) = env::var("SEED_DATA") {
            config.seed_data = Some(v);
        }
        if let Ok(v) = env::var("DYNAMODB_ENDPOINT") {
            config.dynamodb_endpoint = Some(v);
        }
        config.tables = TableConfig::from_env();

        config
    }
}
