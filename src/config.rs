use std::path::{Path, PathBuf};

use anyhow::Context;
use directories_next::ProjectDirs;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Database {
    pub path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: "http://localhost:8080".to_string(),
            port: 8080,
            database: Database::default(),
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Database {
            path: default_database_path(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from `config.toml` when present,
    /// falling back to built-in defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_PATH);
                if fallback.exists() {
                    Self::read(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        toml::from_str(&raw).context("failed to deserialize config")
    }
}

fn default_database_path() -> PathBuf {
    ProjectDirs::from("", "", "pastedump")
        .map(|dirs| dirs.data_dir().join("pastedump.db"))
        .unwrap_or_else(|| PathBuf::from("pastedump.db"))
}
