use anyhow::{anyhow, Result};
use config::Config;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use crate::database::DATABASE_FILE_NAME;

#[derive(Debug, Clone, Serialize)]
pub struct StaffdbConfig {
    /// Configuration file this config was loaded from (or created at)
    pub config_file: String,

    /// Path to the directory holding the database and log file
    pub data_dir: String,

    /// Write log events to `{data_dir}/staffdb.log`
    pub log_to_file: bool,
}

const EMPTY_CONFIG: &str = r#"### staffdb configuration file

### directory for the database and log file
# data_dir = "~/.staffdb"

### write log events to staffdb.log inside data_dir
# log_to_file = true
"#;

const LOG_FILE_NAME: &str = "staffdb.log";

impl Default for StaffdbConfig {
    fn default() -> Self {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());

        Self {
            config_file: format!("{}/.staffdb/staffdb.toml", home_dir),
            data_dir: format!("{}/.staffdb", home_dir),
            log_to_file: true,
        }
    }
}

impl StaffdbConfig {
    /// Function to create and initialize a new configuration
    pub fn new(path: &Option<String>) -> Result<StaffdbConfig> {
        let mut builder = Config::builder();

        // By default use $HOME/.staffdb/staffdb.toml as the configuration file path
        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow!("Could not find home directory"))?
            .to_str()
            .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?
            .to_owned();

        let staffdb_dir = format!("{}/.staffdb", home_dir.as_str());

        let config_file = match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
                p.clone()
            }
            None => {
                std::fs::create_dir_all(staffdb_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create staffdb directory: {}", e))?;
                let p = format!("{}/staffdb.toml", staffdb_dir.as_str());
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.as_str(), e)
                    })?;
                }
                p
            }
        };

        // Add in settings from the environment (with a prefix of STAFFDB)
        // E.g., `STAFFDB_DATA_DIR=/tmp/staff ./staffdb` would set the data directory
        builder = builder.add_source(config::Environment::with_prefix("STAFFDB"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_map(&config, &staffdb_dir, config_file)
    }

    /// Build a configuration from already-merged key/value settings
    fn from_map(
        config: &HashMap<String, String>,
        default_dir: &str,
        config_file: String,
    ) -> Result<StaffdbConfig> {
        let data_dir = match config.get("data_dir") {
            Some(p) => expand_home(p),
            None => default_dir.to_string(),
        };
        std::fs::create_dir_all(data_dir.as_str())
            .map_err(|e| anyhow!("Unable to create data directory {}: {}", data_dir, e))?;

        let log_to_file = match config.get("log_to_file") {
            Some(v) => parse_bool(v)
                .ok_or_else(|| anyhow!("Invalid value for log_to_file: '{}'", v))?,
            None => true,
        };

        Ok(StaffdbConfig {
            config_file,
            data_dir,
            log_to_file,
        })
    }

    /// Get the path to the SQLite database file
    pub fn sqlite_path(&self) -> String {
        let data_dir = self.data_dir.trim_end_matches('/');
        format!("{}/{}", data_dir, DATABASE_FILE_NAME)
    }

    /// Get the path to the log file
    pub fn log_path(&self) -> String {
        let data_dir = self.data_dir.trim_end_matches('/');
        format!("{}/{}", data_dir, LOG_FILE_NAME)
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        let log_target = if self.log_to_file {
            self.log_path()
        } else {
            "disabled".to_string()
        };

        [
            format!("Config File:        {}", self.config_file),
            format!("Data Directory:     {}", self.data_dir),
            format!("SQLite Path:        {}", self.sqlite_path()),
            format!("Log File:           {}", log_target),
        ]
        .join("\n")
    }
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &str) -> String {
    match (path.strip_prefix('~'), dirs::home_dir()) {
        (Some(rest), Some(home)) => format!("{}{}", home.to_string_lossy(), rest),
        _ => path.to_string(),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
