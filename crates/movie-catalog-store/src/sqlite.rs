//! SQLite-backed movie store.

use movie_catalog_core::{genre, MovieStore};
use movie_catalog_models::{Movie, MoviePatch, NewMovie};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::schema::{open_database, open_memory};

const SELECT_DETAIL: &str = "SELECT id, name, year, status, type, country, genres, rating, watched_date, note
     FROM movie_detail";

pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = open_database(path)?;
        debug!(path = %path.display(), "Opened SQLite store");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            conn: open_memory()?,
            path: None,
        })
    }

    /// Database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl MovieStore for SqliteStore {
    type Error = StoreError;

    fn backend_name(&self) -> &str {
        "sqlite"
    }

    fn load(&self) -> Result<Vec<Movie>> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_DETAIL} ORDER BY id"))?;
        let movies = stmt
            .query_map([], row_to_movie)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(count = movies.len(), "Loaded movies from SQLite");
        Ok(movies)
    }

    fn get(&self, id: i64) -> Result<Option<Movie>> {
        let movie = self
            .conn
            .query_row(&format!("{SELECT_DETAIL} WHERE id = ?1"), [id], row_to_movie)
            .optional()?;
        Ok(movie)
    }

    fn create(&mut self, movie: NewMovie) -> Result<i64> {
        let tx = self.conn.transaction()?;
        let movie = movie.into_movie(0);
        tx.execute(
            "INSERT INTO movie (name, year, status, type, country, rating, watched_date, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                movie.name,
                movie.year,
                movie.status.as_str(),
                movie.media_type.as_str(),
                movie.country,
                movie.rating,
                movie.watched_date,
                movie.note,
            ],
        )?;
        let id = tx.last_insert_rowid();
        link_genres(&tx, id, &movie.genres)?;
        tx.commit()?;

        info!(id, name = %movie.name, "Added movie");
        Ok(id)
    }

    fn update(&mut self, id: i64, patch: &MoviePatch) -> Result<Movie> {
        let mut movie = self.get(id)?.ok_or(StoreError::NotFound { id })?;
        if patch.is_empty() {
            return Ok(movie);
        }
        patch.apply(&mut movie);

        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE movie SET name = ?1, year = ?2, status = ?3, type = ?4, country = ?5,
                 rating = ?6, watched_date = ?7, note = ?8
             WHERE id = ?9",
            params![
                movie.name,
                movie.year,
                movie.status.as_str(),
                movie.media_type.as_str(),
                movie.country,
                movie.rating,
                movie.watched_date,
                movie.note,
                id,
            ],
        )?;
        if patch.genres.is_some() {
            tx.execute("DELETE FROM movie_genre WHERE movie_id = ?1", [id])?;
            link_genres(&tx, id, &movie.genres)?;
        }
        tx.commit()?;

        info!(id, fields = ?patch.changed_fields(), "Updated movie");
        Ok(movie)
    }

    fn delete(&mut self, id: i64) -> Result<Movie> {
        let movie = self.get(id)?.ok_or(StoreError::NotFound { id })?;
        self.conn.execute("DELETE FROM movie WHERE id = ?1", [id])?;
        info!(id, name = %movie.name, "Deleted movie");
        Ok(movie)
    }

    fn replace_all(&mut self, movies: &[Movie], on_row: &mut dyn FnMut(&Movie)) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(
            "DELETE FROM movie_genre;
             DELETE FROM movie;
             DELETE FROM genre;
             DELETE FROM sqlite_sequence WHERE name IN ('movie', 'genre');",
        )?;
        for movie in movies {
            tx.execute(
                "INSERT INTO movie (id, name, year, status, type, country, rating, watched_date, note)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    movie.id,
                    movie.name,
                    movie.year,
                    movie.status.as_str(),
                    movie.media_type.as_str(),
                    movie.country,
                    movie.rating,
                    movie.watched_date,
                    movie.note,
                ],
            )?;
            link_genres(&tx, movie.id, &movie.genres)?;
            on_row(movie);
        }
        tx.commit()?;

        info!(count = movies.len(), "Replaced SQLite collection");
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM movie", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn countries(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT country FROM movie WHERE country IS NOT NULL ORDER BY country")?;
        let countries = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(countries)
    }

    fn genres(&self) -> Result<Vec<String>> {
        // genres left behind by deleted movies are not reported
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT g.name FROM genre g
             JOIN movie_genre mg ON mg.genre_id = g.id
             ORDER BY g.name",
        )?;
        let genres = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(genres)
    }
}

/// Insert missing genre rows and link them to the movie
fn link_genres(tx: &Transaction<'_>, movie_id: i64, genres: &BTreeSet<String>) -> Result<()> {
    for name in genres {
        tx.execute("INSERT OR IGNORE INTO genre (name) VALUES (?1)", [name])?;
        let genre_id: i64 = tx.query_row("SELECT id FROM genre WHERE name = ?1", [name], |row| row.get(0))?;
        tx.execute(
            "INSERT OR IGNORE INTO movie_genre (movie_id, genre_id) VALUES (?1, ?2)",
            params![movie_id, genre_id],
        )?;
    }
    Ok(())
}

fn row_to_movie(row: &Row<'_>) -> rusqlite::Result<Movie> {
    let status: String = row.get(3)?;
    let media_type: String = row.get(4)?;
    let genres: Option<String> = row.get(6)?;
    Ok(Movie {
        id: row.get(0)?,
        name: row.get(1)?,
        year: row.get(2)?,
        status: parse_column(3, &status)?,
        media_type: parse_column(4, &media_type)?,
        country: row.get(5)?,
        genres: genres.as_deref().map(genre::parse).unwrap_or_default(),
        rating: row.get(7)?,
        watched_date: row.get(8)?,
        note: row.get(9)?,
    })
}

fn parse_column<T: FromStr<Err = String>>(idx: usize, raw: &str) -> rusqlite::Result<T> {
    raw.parse()
        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use movie_catalog_models::{MediaType, Status};

    fn new_movie(name: &str, year: i32, genres: &str) -> NewMovie {
        NewMovie {
            year: Some(year),
            country: Some("US".to_string()),
            genres: genre::parse(genres),
            ..NewMovie::new(name, Status::Waiting, MediaType::Movie)
        }
    }

    fn seeded() -> SqliteStore {
        let mut store = SqliteStore::in_memory().unwrap();
        for (name, year, genres) in [
            ("Inception", 2010, "action,sci-fi,thriller,epic"),
            ("Interstellar", 2014, "time travel,adventure,sci-fi,epic"),
            ("The Boy and the Beast", 2015, "animation,adventure,fantasy"),
            ("Her", 2013, "comedy,romance,sci-fi"),
            ("Soul", 2020, "animation"),
        ] {
            store.create(new_movie(name, year, genres)).unwrap();
        }
        store
    }

    #[test]
    fn test_read_db() {
        let store = seeded();
        assert_eq!(store.get(1).unwrap().unwrap().name, "Inception");
        assert_eq!(store.get(5).unwrap().unwrap().name, "Soul");
        assert!(store.get(6).unwrap().is_none());
        assert_eq!(store.count().unwrap(), 5);
    }

    #[test]
    fn test_genres_round_trip() {
        let store = seeded();
        let interstellar = store.get(2).unwrap().unwrap();
        assert_eq!(interstellar.genres, genre::parse("adventure,epic,sci-fi,time travel"));
        let soul = store.get(5).unwrap().unwrap();
        assert_eq!(soul.genres.len(), 1);
    }

    #[test]
    fn test_add_db() {
        let mut store = seeded();
        let frieren = NewMovie {
            year: Some(2023),
            country: Some("Japan".to_string()),
            genres: genre::parse("animation,adventure,fantasy"),
            ..NewMovie::new("Frieren", Status::Waiting, MediaType::Series)
        };
        let id = store.create(frieren).unwrap();
        assert_eq!(id, 6);
        assert_eq!(store.count().unwrap(), 6);
        let stored = store.get(6).unwrap().unwrap();
        assert_eq!(stored.name, "Frieren");
        assert_eq!(stored.media_type, MediaType::Series);
    }

    #[test]
    fn test_update_db() {
        let mut store = seeded();
        let patch = MoviePatch {
            note: Some(Some("updated note :)".to_string())),
            ..MoviePatch::default()
        };
        let updated = store.update(5, &patch).unwrap();
        assert_eq!(updated.note.as_deref(), Some("updated note :)"));
        assert_eq!(store.get(5).unwrap().unwrap().note.as_deref(), Some("updated note :)"));
        assert_eq!(store.count().unwrap(), 5);
    }

    #[test]
    fn test_update_replaces_genres_and_keeps_other_fields() {
        let mut store = seeded();
        let patch = MoviePatch {
            status: Some(Status::Completed),
            rating: Some(Some(9)),
            genres: Some(genre::parse("animation,music")),
            ..MoviePatch::default()
        };
        store.update(5, &patch).unwrap();
        let soul = store.get(5).unwrap().unwrap();
        assert_eq!(soul.genres, genre::parse("music,animation"));
        assert_eq!(soul.rating, Some(9));
        assert_eq!(soul.year, Some(2020));
        assert_eq!(store.genres().unwrap().iter().filter(|g| *g == "music").count(), 1);
    }

    #[test]
    fn test_update_to_waiting_clears_watch_fields() {
        let mut store = seeded();
        store
            .update(
                1,
                &MoviePatch {
                    status: Some(Status::Completed),
                    rating: Some(Some(8)),
                    watched_date: Some(Some("2024-05".to_string())),
                    ..MoviePatch::default()
                },
            )
            .unwrap();
        let back = store
            .update(1, &MoviePatch { status: Some(Status::Waiting), ..MoviePatch::default() })
            .unwrap();
        assert_eq!(back.rating, None);
        assert_eq!(back.watched_date, None);
    }

    #[test]
    fn test_update_missing_id() {
        let mut store = seeded();
        let patch = MoviePatch { name: Some("x".to_string()), ..MoviePatch::default() };
        assert!(matches!(store.update(42, &patch), Err(StoreError::NotFound { id: 42 })));
    }

    #[test]
    fn test_delete_db() {
        let mut store = seeded();
        assert_eq!(store.delete(1).unwrap().name, "Inception");
        assert!(store.get(1).unwrap().is_none());
        assert_eq!(store.count().unwrap(), 4);

        store.delete(2).unwrap();
        assert!(store.get(2).unwrap().is_none());
        assert_eq!(store.count().unwrap(), 3);

        assert!(matches!(store.delete(1), Err(StoreError::NotFound { id: 1 })));
    }

    #[test]
    fn test_delete_cascades_genre_links() {
        let mut store = seeded();
        store.delete(1).unwrap();
        let links: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM movie_genre WHERE movie_id = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(links, 0);
        // "thriller" only belonged to Inception
        assert!(!store.genres().unwrap().contains(&"thriller".to_string()));
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut store = seeded();
        store.delete(5).unwrap();
        let id = store.create(new_movie("Coco", 2017, "animation")).unwrap();
        assert_eq!(id, 6);
    }

    #[test]
    fn test_replace_all_keeps_ids() {
        let mut source = seeded();
        source.delete(2).unwrap();
        let movies = source.load().unwrap();

        let mut target = SqliteStore::in_memory().unwrap();
        target.create(new_movie("Stale", 2000, "drama")).unwrap();
        let mut seen = 0;
        target.replace_all(&movies, &mut |_| seen += 1).unwrap();

        assert_eq!(seen, 4);
        assert_eq!(target.load().unwrap(), movies);
        assert!(target.get(2).unwrap().is_none());
        assert_eq!(target.create(new_movie("Next", 2021, "")).unwrap(), 6);
    }

    #[test]
    fn test_distinct_countries() {
        let mut store = seeded();
        store
            .update(3, &MoviePatch { country: Some(Some("Japan".to_string())), ..MoviePatch::default() })
            .unwrap();
        store
            .update(4, &MoviePatch { country: Some(None), ..MoviePatch::default() })
            .unwrap();
        assert_eq!(store.countries().unwrap(), vec!["Japan".to_string(), "US".to_string()]);
    }
}
