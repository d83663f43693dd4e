use movie_catalog_models::DEFAULT_COUNTRIES;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::paths::PathManager;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub choices: ChoicesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which store the commands read from and write to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Csv,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Sqlite => f.write_str("sqlite"),
            StorageBackend::Csv => f.write_str("csv"),
        }
    }
}

/// Data files. Relative paths are resolved against the data directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_database")]
    pub database: PathBuf,
    #[serde(default = "default_csv")]
    pub csv: PathBuf,
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,
    #[serde(default = "default_sql_dir")]
    pub sql_dir: PathBuf,
    /// Rewrite the CSV copy after every change made through SQLite
    #[serde(default = "default_true")]
    pub mirror_csv: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoicesConfig {
    /// Countries offered (and resolved by initial) in prompts and filters
    #[serde(default = "default_countries")]
    pub countries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json_logging")]
    pub json: bool,
    pub file: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database: default_database(),
            csv: default_csv(),
            backup_dir: default_backup_dir(),
            sql_dir: default_sql_dir(),
            mirror_csv: default_true(),
        }
    }
}

impl Default for ChoicesConfig {
    fn default() -> Self {
        Self {
            countries: default_countries(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json_logging(),
            file: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_database() -> PathBuf {
    PathBuf::from("movies.db")
}

fn default_csv() -> PathBuf {
    PathBuf::from("movies.csv")
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("backups")
}

fn default_sql_dir() -> PathBuf {
    PathBuf::from("sql")
}

fn default_countries() -> Vec<String> {
    DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json_logging() -> bool {
    false
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path`, or the defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.choices.countries.is_empty() {
            return Err(anyhow::anyhow!("choices.countries cannot be empty"));
        }
        if self.choices.countries.iter().any(|c| c.trim().is_empty()) {
            return Err(anyhow::anyhow!("choices.countries cannot contain blank entries"));
        }

        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid logging.level '{}', expected one of: {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            ));
        }

        if self.storage.database.as_os_str().is_empty() || self.storage.csv.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("storage.database and storage.csv are required"));
        }

        Ok(())
    }

    pub fn database_path(&self, paths: &PathManager) -> PathBuf {
        paths.resolve_data_path(&self.storage.database)
    }

    pub fn csv_path(&self, paths: &PathManager) -> PathBuf {
        paths.resolve_data_path(&self.storage.csv)
    }

    pub fn backup_dir(&self, paths: &PathManager) -> PathBuf {
        paths.resolve_data_path(&self.storage.backup_dir)
    }

    pub fn sql_dir(&self, paths: &PathManager) -> PathBuf {
        paths.resolve_data_path(&self.storage.sql_dir)
    }

    /// File of the configured backend
    pub fn active_data_path(&self, paths: &PathManager) -> PathBuf {
        match self.storage.backend {
            StorageBackend::Sqlite => self.database_path(paths),
            StorageBackend::Csv => self.csv_path(paths),
        }
    }

    pub fn log_file(&self, paths: &PathManager) -> Option<PathBuf> {
        self.logging.file.as_deref().map(|file| paths.resolve_log_path(file))
    }
}
