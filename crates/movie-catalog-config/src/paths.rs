use anyhow::Result;
use std::path::{Path, PathBuf};

/// Environment variable that relocates every file of the tool
pub const BASE_PATH_ENV: &str = "MOVIESHELF_BASE_PATH";

/// Base path from the environment, if set and non-empty
pub fn base_path_override() -> Option<PathBuf> {
    std::env::var(BASE_PATH_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

#[derive(Debug, Clone)]
pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        if let Some(base) = base_path_override() {
            return Ok(Self::from_base(base));
        }
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("movieshelf");
        Ok(Self::from_base(base_dir))
    }

    /// Config file at the base level, data and logs in subdirectories
    pub fn from_base(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Relative paths from the config are taken relative to the data directory
    pub fn resolve_data_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    /// Relative log file paths live in the log directory
    pub fn resolve_log_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.log_dir.join(path)
        }
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // Platform paths (e.g. ~/.config/movieshelf on Linux), or the working
        // directory when the platform has none
        Self::new().unwrap_or_else(|_| Self::from_base(".movieshelf"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_base() {
        let paths = PathManager::from_base("/srv/movies");
        assert_eq!(paths.config_file(), PathBuf::from("/srv/movies/config.toml"));
        assert_eq!(paths.data_dir(), Path::new("/srv/movies/data"));
        assert_eq!(paths.log_dir(), Path::new("/srv/movies/logs"));
    }

    #[test]
    fn test_resolve_paths() {
        let paths = PathManager::from_base("/srv/movies");
        assert_eq!(paths.resolve_data_path(Path::new("movies.db")), PathBuf::from("/srv/movies/data/movies.db"));
        assert_eq!(paths.resolve_data_path(Path::new("/tmp/a.csv")), PathBuf::from("/tmp/a.csv"));
        assert_eq!(paths.resolve_log_path(Path::new("cli.log")), PathBuf::from("/srv/movies/logs/cli.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::from_base(dir.path().join("shelf"));
        paths.ensure_directories().unwrap();
        assert!(paths.data_dir().is_dir());
        assert!(paths.log_dir().is_dir());
    }
}
