//! Saved SQL queries: a directory of `*.sql` files run by (fuzzy) name.

use movie_catalog_core::fuzzy::{self, MatchType};
use movie_catalog_core::sort::compare_keys;
use movie_catalog_core::{normalize, CellValue, SortDirection};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, StoreError};

/// Files that are never offered as queries
const EXCLUDED: [&str; 1] = ["schema.sql"];

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedScript {
    pub name: String,
    pub path: PathBuf,
    pub match_type: MatchType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl QueryResult {
    /// Stable sort of the rows by one column, missing values last
    pub fn sort_by(&mut self, column: usize, direction: SortDirection) {
        if column >= self.columns.len() {
            return;
        }
        let mut keyed: Vec<_> = std::mem::take(&mut self.rows)
            .into_iter()
            .map(|row| (normalize(&row[column]), row))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, direction));
        self.rows = keyed.into_iter().map(|(_, row)| row).collect();
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }
}

/// Script names (file stems) in `dir`, sorted
pub fn list_scripts(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "sql"))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| !EXCLUDED.contains(&n))
        })
        .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
        .collect();
    names.sort();
    Ok(names)
}

/// Find the script `name` refers to: exact, unique prefix, then fuzzy
pub fn resolve_script(dir: &Path, name: &str) -> Result<ResolvedScript> {
    let scripts = list_scripts(dir)?;
    let (resolved, match_type) = fuzzy::resolve_unique(name, &scripts)?;
    debug!(input = name, resolved = %resolved, %match_type, "Resolved SQL script");
    Ok(ResolvedScript {
        path: dir.join(format!("{resolved}.sql")),
        name: resolved,
        match_type,
    })
}

pub fn run_script(conn: &Connection, script: &Path) -> Result<QueryResult> {
    if !script.exists() {
        return Err(StoreError::MissingFile(script.to_path_buf()));
    }
    let sql = std::fs::read_to_string(script)?;
    run_query(conn, &sql)
}

/// Run a single statement and collect every row
pub fn run_query(conn: &Connection, sql: &str) -> Result<QueryResult> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(str::to_string).collect();
    let width = columns.len();

    let mut rows = Vec::new();
    let mut cursor = stmt.query([])?;
    while let Some(row) = cursor.next()? {
        let cells = (0..width)
            .map(|i| row.get_ref(i).map(to_cell))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.push(cells);
    }
    debug!(columns = width, rows = rows.len(), "Ran query");
    Ok(QueryResult { columns, rows })
}

fn to_cell(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::Integer(i) => CellValue::Int(i),
        ValueRef::Real(f) => CellValue::Float(f),
        ValueRef::Text(bytes) => CellValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => CellValue::Text(format!("<{} bytes>", bytes.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SqliteStore;
    use movie_catalog_core::{CatalogError, MovieStore};
    use movie_catalog_models::{MediaType, NewMovie, Status};

    fn script_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, sql) in [
            ("top_rated", "SELECT name, rating FROM movie WHERE rating IS NOT NULL ORDER BY rating DESC;"),
            ("watched_by_year", "SELECT substr(watched_date, 1, 4) AS year, COUNT(*) FROM movie GROUP BY 1;"),
            ("waiting_list", "SELECT name FROM movie WHERE status = 'waiting';"),
            ("schema", "CREATE TABLE x (id INTEGER);"),
        ] {
            std::fs::write(dir.path().join(format!("{name}.sql")), sql).unwrap();
        }
        std::fs::write(dir.path().join("README.md"), "not a script").unwrap();
        dir
    }

    #[test]
    fn test_list_scripts_skips_schema() {
        let dir = script_dir();
        assert_eq!(list_scripts(dir.path()).unwrap(), vec!["top_rated", "waiting_list", "watched_by_year"]);
    }

    #[test]
    fn test_resolve_script() {
        let dir = script_dir();
        let exact = resolve_script(dir.path(), "top_rated").unwrap();
        assert_eq!(exact.match_type, MatchType::Exact);
        assert_eq!(exact.path, dir.path().join("top_rated.sql"));

        assert_eq!(resolve_script(dir.path(), "top").unwrap().match_type, MatchType::Prefix);
        assert_eq!(resolve_script(dir.path(), "waiting_lst").unwrap().name, "waiting_list");

        assert!(matches!(
            resolve_script(dir.path(), "wa"),
            Err(StoreError::Catalog(CatalogError::AmbiguousMatch { .. }))
        ));
        assert!(matches!(
            resolve_script(dir.path(), "qqqq"),
            Err(StoreError::Catalog(CatalogError::NoMatch { .. }))
        ));
    }

    #[test]
    fn test_run_script_and_sort() {
        let dir = script_dir();
        let mut store = SqliteStore::in_memory().unwrap();
        for (name, rating) in [("Her", 8), ("Soul", 9), ("Inception", 10)] {
            store
                .create(NewMovie {
                    rating: Some(rating),
                    ..NewMovie::new(name, Status::Completed, MediaType::Movie)
                })
                .unwrap();
        }
        store.create(NewMovie::new("Frieren", Status::Waiting, MediaType::Series)).unwrap();

        let mut result = run_script(store.connection(), &dir.path().join("top_rated.sql")).unwrap();
        assert_eq!(result.columns, vec!["name", "rating"]);
        assert_eq!(result.rows.len(), 3);
        assert_eq!(result.rows[0][0], CellValue::Text("Inception".to_string()));

        let rating = result.column_index("RATING").unwrap();
        result.sort_by(rating, SortDirection::Ascending);
        assert_eq!(result.rows[0], vec![CellValue::Text("Her".to_string()), CellValue::Int(8)]);
    }

    #[test]
    fn test_nulls_and_reals() {
        let store = SqliteStore::in_memory().unwrap();
        let result = run_query(store.connection(), "SELECT NULL AS a, 1.5 AS b, 'x' AS c").unwrap();
        assert_eq!(
            result.rows,
            vec![vec![CellValue::Null, CellValue::Float(1.5), CellValue::Text("x".to_string())]]
        );
    }
}
