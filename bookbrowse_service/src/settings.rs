//! Service settings, layered from built-in defaults, an optional config file
//! and `BOOKBROWSE__`-prefixed environment variables (in that order).
//!
//! Nested keys use `__` as separator, e.g. `BOOKBROWSE__STORE__BACKEND=postgres`.

use anyhow::Context;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::books_store::{PostgresBooksStoreConfig, SqliteBooksStoreConfig};

const ENV_PREFIX: &str = "BOOKBROWSE";
/// Env variable pointing to the config file, without extension
const CONFIG_PATH_ENV: &str = "BOOKBROWSE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/bookbrowse";

#[derive(Debug, Clone, Copy, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    InMemory,
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub sqlite_url: String,
    pub sqlite_max_connections: u32,
    pub postgres: PostgresBooksStoreConfig,
    pub seed_sample_books: bool,
}

impl StoreSettings {
    pub fn sqlite_config(&self) -> SqliteBooksStoreConfig {
        SqliteBooksStoreConfig {
            url: self.sqlite_url.clone(),
            max_connections: self.sqlite_max_connections,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    pub service_name: String,
    pub jaeger_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Loads settings from the file named by `BOOKBROWSE_CONFIG` (or `config/bookbrowse`) and the environment
    pub fn load() -> anyhow::Result<Self> {
        let config_path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&config_path, Environment::with_prefix(ENV_PREFIX).separator("__"))
    }

    fn load_from(config_path: &str, environment: Environment) -> anyhow::Result<Self> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("store.backend", "sqlite")?
            .set_default("store.sqlite_url", "sqlite://book.db")?
            .set_default("store.sqlite_max_connections", 5)?
            .set_default("store.postgres.hostname", "127.0.0.1")?
            .set_default("store.postgres.username", "postgres")?
            .set_default("store.postgres.password", "postgres")?
            .set_default("store.seed_sample_books", false)?
            .set_default("telemetry.service_name", "bookbrowse_service")?
            .set_default("telemetry.jaeger_enabled", false)?
            .add_source(File::with_name(config_path).required(false))
            .add_source(environment.try_parsing(true))
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }
}
