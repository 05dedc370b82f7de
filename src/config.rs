//! Configuration file handling.
//!
//! The configuration file is stored at `$PRODUCT_SALES_HOME/config.json` next to the SQLite
//! database. It holds the URL of the seed feed and the settings of the HTTP server.

use crate::db::Db;
use crate::error::Res;
use crate::utils;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "product-sales";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const SQLITE_FILE: &str = "product-sales.sqlite";

pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to the home directory and from there it loads `config.json` and opens the database.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    db: Db,
    sqlite_path: PathBuf,
}

impl Config {
    /// Creates the home directory and:
    /// - Writes an initial `config.json` with default settings and the given `seed_url`
    /// - Creates the SQLite database with an empty transactions table
    ///
    /// # Errors
    /// - Returns an error if the directory already holds a config file or a database, or if any
    ///   file operation fails.
    pub async fn create(dir: impl Into<PathBuf>, seed_url: Option<&str>) -> Res<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!("A config file already exists at '{}'", config_path.display());
        }

        let mut config_file = ConfigFile::default();
        if let Some(url) = seed_url {
            config_file.seed_url = url.to_string();
        }
        config_file.validate()?;

        let sqlite_path = root.join(SQLITE_FILE);
        let db = Db::init(&sqlite_path, config_file.max_connections)
            .await
            .context("Unable to create SQLite DB")?;
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            db,
            sqlite_path,
        })
    }

    /// This will
    /// - validate that the home directory and the config file exist
    /// - load and validate the config file
    /// - open the database, migrating its schema if needed
    pub async fn load(home: impl Into<PathBuf>) -> Res<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The home directory is missing, run 'product-sales init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let sqlite_path = root.join(SQLITE_FILE);
        let db = Db::load(&sqlite_path, config_file.max_connections)
            .await
            .context("Unable to load SQLite DB")?;

        Ok(Self {
            root,
            config_path,
            config_file,
            db,
            sqlite_path,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn sqlite_path(&self) -> &Path {
        &self.sqlite_path
    }

    pub(crate) fn db(&self) -> &Db {
        &self.db
    }

    pub fn seed_url(&self) -> &str {
        &self.config_file.seed_url
    }

    /// The address the HTTP server listens on.
    pub fn bind_address(&self) -> Res<SocketAddr> {
        self.config_file.bind_address()
    }

    /// How long a single request may run before all of its queries are abandoned.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config_file.request_timeout_secs)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "product-sales",
///   "config_version": 1,
///   "seed_url": "https://s3.amazonaws.com/roxiler.com/product_transaction.json",
///   "bind_address": "127.0.0.1:3000",
///   "request_timeout_secs": 30,
///   "max_connections": 5
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "product-sales"
    app_name: String,

    config_version: u8,

    /// Where `/initialize` fetches the transaction records from
    #[serde(default = "default_seed_url")]
    seed_url: String,

    /// `host:port` for the HTTP server
    #[serde(default = "default_bind_address")]
    bind_address: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,

    /// Size of the SQLite connection pool
    #[serde(default = "default_max_connections")]
    max_connections: u32,
}

fn default_seed_url() -> String {
    DEFAULT_SEED_URL.to_string()
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            seed_url: default_seed_url(),
            bind_address: default_bind_address(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl ConfigFile {
    /// Loads and validates a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or holds invalid settings
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;
        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file at {}", path.display()))?;
        Ok(config)
    }

    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    fn validate(&self) -> Res<()> {
        anyhow::ensure!(
            self.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            self.app_name
        );
        url::Url::parse(&self.seed_url)
            .with_context(|| format!("Invalid seed_url '{}'", self.seed_url))?;
        self.bind_address()?;
        anyhow::ensure!(
            self.request_timeout_secs > 0,
            "request_timeout_secs must be greater than 0"
        );
        anyhow::ensure!(
            self.max_connections > 0,
            "max_connections must be greater than 0"
        );
        Ok(())
    }

    fn bind_address(&self) -> Res<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("Invalid bind_address '{}'", self.bind_address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create_and_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let url = "https://example.com/feed.json";

        let config = Config::create(&home, Some(url)).await.unwrap();
        assert_eq!(config.seed_url(), url);
        assert!(config.config_path().is_file());
        assert!(config.sqlite_path().is_file());
        config.db().close().await;

        let loaded = Config::load(&home).await.unwrap();
        assert_eq!(loaded.seed_url(), url);
        assert_eq!(loaded.request_timeout(), Duration::from_secs(30));
        assert_eq!(
            loaded.bind_address().unwrap(),
            "127.0.0.1:3000".parse::<SocketAddr>().unwrap()
        );
    }

    #[tokio::test]
    async fn test_config_create_twice_fails() {
        let dir = TempDir::new().unwrap();
        Config::create(dir.path(), None).await.unwrap();
        assert!(Config::create(dir.path(), None).await.is_err());
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(dir.path().join("nope")).await.unwrap_err();
        assert!(err.to_string().contains("home directory is missing"));
    }

    #[tokio::test]
    async fn test_config_file_load_with_minimal_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let json = r#"{ "app_name": "product-sales", "config_version": 1 }"#;
        utils::write(&path, json).await.unwrap();

        let config = ConfigFile::load(&path).await.unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let json = r#"{ "app_name": "tiller", "config_version": 1 }"#;
        utils::write(&path, json).await.unwrap();

        let err = ConfigFile::load(&path).await.unwrap_err();
        assert!(format!("{err:#}").contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_rejects_bad_settings() {
        let mut config = ConfigFile::default();
        config.bind_address = "not an address".into();
        assert!(config.validate().is_err());

        let mut config = ConfigFile::default();
        config.seed_url = "::".into();
        assert!(config.validate().is_err());

        let mut config = ConfigFile::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut saved = ConfigFile::default();
        saved.bind_address = "0.0.0.0:8080".into();
        saved.max_connections = 2;
        saved.save(&path).await.unwrap();
        assert_eq!(ConfigFile::load(&path).await.unwrap(), saved);
    }
}
