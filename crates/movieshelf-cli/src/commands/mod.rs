pub mod add;
pub mod config;
pub mod delete;
pub mod filter;
pub mod list;
pub mod maintenance;
pub mod migrate;
pub mod prompts;
pub mod show;
pub mod sql;
pub mod stats;
pub mod update;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use movie_catalog_config::{Config, PathManager, StorageBackend};
use movie_catalog_core::{CatalogError, ChoiceSet, FilterEngine, MovieStore};
use movie_catalog_models::{MediaType, Status};
use movie_catalog_store::{CsvStore, SqliteStore, StoreError};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, warn};

pub type Store = Box<dyn MovieStore<Error = StoreError>>;

/// Everything a command needs: the effective config and where files live
///
/// Built once per invocation. Stores are opened on demand and dropped when
/// the command returns.
pub struct Session {
    pub config: Config,
    pub paths: PathManager,
    pub config_file: PathBuf,
}

impl Session {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let paths = PathManager::default();
        let config_file = config_override.unwrap_or_else(|| paths.config_file());

        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| eyre!("Invalid config {}: {}", config_file.display(), e))?;

        Ok(Self {
            config,
            paths,
            config_file,
        })
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.config.log_file(&self.paths)
    }

    /// Log country initials that resolve to more than one choice
    pub fn warn_about_choices(&self) {
        for (initial, choices) in self.countries().colliding_initials() {
            warn!(
                initial = %initial,
                choices = ?choices,
                "Several countries share an initial, it resolves to the first one"
            );
        }
    }

    pub fn countries(&self) -> ChoiceSet {
        ChoiceSet::new(self.config.choices.countries.iter().cloned())
    }

    pub fn statuses(&self) -> ChoiceSet {
        ChoiceSet::new(Status::NAMES)
    }

    pub fn types(&self) -> ChoiceSet {
        ChoiceSet::new(MediaType::NAMES)
    }

    pub fn parse_status(&self, input: &str) -> movie_catalog_core::Result<Status> {
        pick(&self.statuses(), input)
    }

    pub fn parse_type(&self, input: &str) -> movie_catalog_core::Result<MediaType> {
        pick(&self.types(), input)
    }

    /// Blank input means no country
    pub fn parse_country(&self, input: &str) -> movie_catalog_core::Result<Option<String>> {
        if input.trim().is_empty() {
            return Ok(None);
        }
        let countries = self.countries();
        countries.resolve_strict(input).map(|c| Some(c.to_string()))
    }

    pub fn engine(&self) -> FilterEngine {
        FilterEngine::new(self.config.choices.countries.iter().cloned())
    }

    /// Open the configured backend
    pub fn open_store(&self) -> Result<Store> {
        let store: Store = match self.config.storage.backend {
            StorageBackend::Sqlite => Box::new(self.open_sqlite()?),
            StorageBackend::Csv => Box::new(self.open_csv()),
        };
        debug!(backend = store.backend_name(), "Opened store");
        Ok(store)
    }

    pub fn open_sqlite(&self) -> Result<SqliteStore> {
        let path = self.config.database_path(&self.paths);
        SqliteStore::open(&path).wrap_err_with(|| format!("Failed to open database {}", path.display()))
    }

    pub fn open_csv(&self) -> CsvStore {
        CsvStore::new(self.config.csv_path(&self.paths))
    }

    /// Keep the CSV copy in step after a change made through SQLite
    pub fn sync_mirror(&self, store: &dyn MovieStore<Error = StoreError>) -> Result<()> {
        if self.config.storage.backend != StorageBackend::Sqlite || !self.config.storage.mirror_csv {
            return Ok(());
        }
        let movies = store.load()?;
        let mut csv = self.open_csv();
        csv.replace_all(&movies, &mut |_| {})
            .wrap_err_with(|| format!("Failed to update CSV copy {}", csv.path().display()))?;
        debug!(count = movies.len(), "Updated CSV mirror");
        Ok(())
    }
}

/// Resolve a choice strictly and convert the canonical name
fn pick<T: FromStr>(set: &ChoiceSet, input: &str) -> movie_catalog_core::Result<T> {
    let invalid = || CatalogError::InvalidChoice {
        value: input.trim().to_string(),
        choices: set.choices().to_vec(),
    };
    set.resolve_strict(input)?.parse().map_err(|_| invalid())
}

/// Session over the default config rooted in `base`
#[cfg(test)]
pub(crate) fn test_session(base: &std::path::Path) -> Session {
    let paths = PathManager::from_base(base);
    Session {
        config: Config::default(),
        config_file: paths.config_file(),
        paths,
    }
}
