//! Configuration file handling.
//!
//! The configuration file is stored at `$EXPENSE_HOME/config.json`. Durable expense data lives
//! next to it in `$EXPENSE_HOME/storage`.

use crate::error::{ErrorType, IntoResult};
use crate::storage::FileStore;
use crate::store::ExpenseStore;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "expense";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const STORAGE: &str = "storage";
const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$EXPENSE_HOME` and from there it loads `$EXPENSE_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    storage: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, its storage directory and an initial `config.json`.
    ///
    /// Running it against an existing home keeps the existing `config.json` and data.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the expense home directory")
            .pub_result(ErrorType::Config)?;
        let root = utils::canonicalize(&maybe_relative)
            .await
            .pub_result(ErrorType::Config)?;

        let storage = root.join(STORAGE);
        utils::make_dir(&storage)
            .await
            .pub_result(ErrorType::Config)?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = if config_path.is_file() {
            ConfigFile::load(&config_path)
                .await
                .pub_result(ErrorType::Config)?
        } else {
            let config_file = ConfigFile::default();
            config_file
                .save(&config_path)
                .await
                .pub_result(ErrorType::Config)?;
            config_file
        };

        Ok(Self {
            root,
            storage,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that the home directory and the config file exist
    /// - load the config file
    /// - validate that the storage directory exists
    pub async fn load(expense_home: impl Into<PathBuf>) -> Result<Self> {
        Self::load_inner(expense_home.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn load_inner(maybe_relative: PathBuf) -> anyhow::Result<Self> {
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The expense home directory is missing, run 'expense init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let storage = root.join(STORAGE);
        if !storage.is_dir() {
            bail!("The storage directory is missing '{}'", storage.display())
        }

        Ok(Self {
            root,
            storage,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn storage(&self) -> &Path {
        &self.storage
    }

    /// The symbol printed in front of amounts.
    pub fn currency_symbol(&self) -> &str {
        self.config_file.currency_symbol()
    }

    /// Opens durable storage and loads the expense collection from it.
    pub async fn open_store(&self) -> Result<ExpenseStore<FileStore>> {
        let storage = FileStore::open(&self.storage)
            .await
            .pub_result(ErrorType::Storage)?;
        Ok(ExpenseStore::load(storage).await)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "expense",
///   "config_version": 1,
///   "currency_symbol": "₹"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "expense"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Printed in front of amounts. Defaults to "₹" if not specified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    currency_symbol: Option<String>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            currency_symbol: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if `app_name` is wrong
    async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    fn currency_symbol(&self) -> &str {
        self.currency_symbol
            .as_deref()
            .unwrap_or(DEFAULT_CURRENCY_SYMBOL)
    }
}
