//! TOML configuration parsing and validation.
//!
//! ```toml
//! [db]
//! path = "./data/fridge.sqlite"
//!
//! [server]
//! bind = "127.0.0.1:8080"
//!
//! [pantry]
//! default_shelf_life_days = 7
//!
//! [logging]
//! filter = "info"
//! ```
//!
//! `[pantry]` and `[logging]` are optional.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub pantry: PantryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PantryConfig {
    /// Shelf life assigned to ingredients created without one.
    #[serde(default = "default_shelf_life_days")]
    pub default_shelf_life_days: i64,
}

impl Default for PantryConfig {
    fn default() -> Self {
        Self {
            default_shelf_life_days: default_shelf_life_days(),
        }
    }
}

fn default_shelf_life_days() -> i64 {
    7
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&content)?;
    validate(&config)?;
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).with_context(|| "Failed to parse config file")
}

fn validate(config: &Config) -> Result<()> {
    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    if config.pantry.default_shelf_life_days < 0 {
        anyhow::bail!("pantry.default_shelf_life_days must be >= 0");
    }

    Ok(())
}
