pub mod config;
pub mod paths;

pub use config::{ChoicesConfig, Config, LoggingConfig, StorageBackend, StorageConfig};
pub use paths::{base_path_override, PathManager, BASE_PATH_ENV};
