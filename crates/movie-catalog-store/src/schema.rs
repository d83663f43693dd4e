//! SQLite schema creation and versioning.

use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

use crate::error::{Result, StoreError};

/// Current schema version. Increment when adding migrations.
pub const CURRENT_VERSION: i32 = 1;

/// Create all tables and the detail view if they don't exist.
///
/// Idempotent, safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    set_schema_version(conn, CURRENT_VERSION)?;
    Ok(())
}

/// Open or create a movie database at the given path.
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    // enables ON DELETE CASCADE on movie_genre
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;

    let version = get_schema_version(&conn)?;
    if version == 0 {
        debug!(path = %path.display(), "Creating database schema");
        create_schema(&conn)?;
    } else if version > CURRENT_VERSION {
        return Err(StoreError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: version,
        });
    }

    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Get the current schema version, or 0 if no schema exists.
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS movie (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    year INTEGER,
    status TEXT NOT NULL CHECK (status IN ('waiting', 'completed', 'dropped')),
    type TEXT NOT NULL CHECK (type IN ('movie', 'series')),
    country TEXT,
    rating INTEGER CHECK (rating BETWEEN 1 AND 10),
    watched_date TEXT,
    note TEXT
);

CREATE TABLE IF NOT EXISTS genre (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS movie_genre (
    movie_id INTEGER NOT NULL REFERENCES movie(id) ON DELETE CASCADE,
    genre_id INTEGER NOT NULL REFERENCES genre(id) ON DELETE CASCADE,
    PRIMARY KEY (movie_id, genre_id)
);

CREATE INDEX IF NOT EXISTS idx_movie_genre_genre ON movie_genre(genre_id);

CREATE VIEW IF NOT EXISTS movie_detail AS
SELECT
    m.id,
    m.name,
    m.year,
    m.status,
    m.type,
    m.country,
    group_concat(g.name, ',') AS genres,
    m.rating,
    m.watched_date,
    m.note
FROM movie m
LEFT JOIN movie_genre mg ON mg.movie_id = m.id
LEFT JOIN genre g ON g.id = mg.genre_id
GROUP BY m.id;
"#;
