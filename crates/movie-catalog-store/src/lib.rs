//! Persistence for the movie catalog.
//!
//! Two interchangeable [`MovieStore`](movie_catalog_core::MovieStore)
//! backends, a SQLite database and a flat CSV file, plus the tooling around
//! them: migration between the two, backups, compaction and saved SQL
//! queries.

pub mod csv_store;
pub mod error;
pub mod maintenance;
pub mod migrate;
pub mod schema;
pub mod script;
pub mod sqlite;

pub use csv_store::CsvStore;
pub use error::{Result, StoreError};
pub use maintenance::{backup_file, format_bytes, restore_file, vacuum, VacuumReport};
pub use migrate::{copy_collection, MigrationReport};
pub use schema::{open_database, open_memory};
pub use script::{resolve_script, run_query, run_script, QueryResult, ResolvedScript};
pub use sqlite::SqliteStore;
