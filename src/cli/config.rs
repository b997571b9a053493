//! CLI configuration file
//!
//! ```json
//! { "data_dir": "./forms", "storage_key": "formBuilder_forms", "log_level": "warn" }
//! ```
//!
//! Only `data_dir` is required.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::observability::{LogFormat, LOG_LEVELS};
use crate::store::{check_key, FileBackend, JsonSchemaStore, DEFAULT_STORAGE_KEY};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the store files (required)
    pub data_dir: String,

    /// Key the schema collection is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Log level when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log line format
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        check_key(&self.storage_key).map_err(|e| {
            CliError::config_error(format!("Invalid storage_key: {}", e))
        })?;

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(CliError::config_error(format!(
                "Invalid log_level: '{}'. Must be one of {}.",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    /// Whether `init` has created the collection file
    pub fn is_initialized(&self) -> bool {
        self.data_path()
            .join(format!("{}.json", self.storage_key))
            .is_file()
    }

    /// Opens the file-backed schema store in the data directory.
    pub fn open_store(&self) -> CliResult<JsonSchemaStore<FileBackend>> {
        let backend = FileBackend::open(self.data_path())?;
        Ok(JsonSchemaStore::open(backend, self.storage_key.clone())?)
    }
}
