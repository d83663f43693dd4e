use movie_catalog_core::CatalogError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("No movie with id {id}")]
    NotFound { id: i64 },

    #[error("Invalid record at line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },

    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    #[error("Schema error: expected version {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },

    #[error("File not found: {}", .0.display())]
    MissingFile(PathBuf),
}

pub type Result<T> = std::result::Result<T, StoreError>;
