//! Copying a collection between backends with ids preserved.

use movie_catalog_core::MovieStore;
use std::time::{Duration, Instant};
use tracing::info;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    pub count: usize,
    pub elapsed: Duration,
}

/// Replace the target's collection with the source's
///
/// `progress` receives `(written, total)` after every record.
pub fn copy_collection<S, T>(
    source: &S,
    target: &mut T,
    progress: &mut dyn FnMut(usize, usize),
) -> Result<MigrationReport>
where
    S: MovieStore<Error = crate::StoreError>,
    T: MovieStore<Error = crate::StoreError>,
{
    let started = Instant::now();
    let movies = source.load()?;
    let total = movies.len();

    let mut written = 0;
    target.replace_all(&movies, &mut |_| {
        written += 1;
        progress(written, total);
    })?;

    let report = MigrationReport {
        count: total,
        elapsed: started.elapsed(),
    };
    info!(
        from = source.backend_name(),
        to = target.backend_name(),
        count = report.count,
        elapsed = ?report.elapsed,
        "Migrated collection"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CsvStore, SqliteStore};
    use movie_catalog_core::genre;
    use movie_catalog_models::{MediaType, NewMovie, Status};

    #[test]
    fn test_csv_to_sqlite_and_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut csv = CsvStore::new(dir.path().join("movies.csv"));
        for name in ["Inception", "Interstellar", "Soul"] {
            csv.create(NewMovie {
                genres: genre::parse("sci-fi,epic"),
                ..NewMovie::new(name, Status::Waiting, MediaType::Movie)
            })
            .unwrap();
        }
        csv.delete(2).unwrap();

        let mut db = SqliteStore::open(dir.path().join("movies.db")).unwrap();
        let mut calls = Vec::new();
        let report = copy_collection(&csv, &mut db, &mut |done, total| calls.push((done, total))).unwrap();

        assert_eq!(report.count, 2);
        assert_eq!(calls, vec![(1, 2), (2, 2)]);
        assert_eq!(db.load().unwrap(), csv.load().unwrap());
        assert!(db.get(2).unwrap().is_none());

        let mut back = CsvStore::new(dir.path().join("copy.csv"));
        copy_collection(&db, &mut back, &mut |_, _| {}).unwrap();
        assert_eq!(back.load().unwrap(), csv.load().unwrap());
    }

    #[test]
    fn test_empty_source() {
        let dir = tempfile::tempdir().unwrap();
        let csv = CsvStore::new(dir.path().join("missing.csv"));
        let mut db = SqliteStore::in_memory().unwrap();
        let report = copy_collection(&csv, &mut db, &mut |_, _| {}).unwrap();
        assert_eq!(report.count, 0);
        assert_eq!(db.count().unwrap(), 0);
    }
}
