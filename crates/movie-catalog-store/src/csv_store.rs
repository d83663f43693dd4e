//! CSV-backed movie store.
//!
//! The file is read wholesale and rewritten atomically on every mutation.
//! Empty cells are the only representation of a missing value.

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use movie_catalog_core::{genre, validate, MovieStore};
use movie_catalog_models::{MediaType, Movie, MoviePatch, NewMovie, Status};
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};

pub const CSV_HEADER: [&str; 10] = [
    "id",
    "name",
    "year",
    "status",
    "type",
    "country",
    "genres",
    "rating",
    "watched_date",
    "note",
];

pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, movies: &[Movie]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // Atomic write: write to temp file, then rename
        let temp_path = self.path.with_extension("csv.tmp");
        {
            let mut writer = WriterBuilder::new().from_path(&temp_path)?;
            writer.write_record(CSV_HEADER)?;
            for movie in movies {
                writer.write_record(to_record(movie))?;
            }
            writer.flush()?;
        }
        std::fs::rename(&temp_path, &self.path)?;

        debug!(path = %self.path.display(), count = movies.len(), "Wrote CSV");
        Ok(())
    }
}

impl MovieStore for CsvStore {
    type Error = StoreError;

    fn backend_name(&self) -> &str {
        "csv"
    }

    fn load(&self) -> Result<Vec<Movie>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "CSV file does not exist yet, starting empty");
            return Ok(Vec::new());
        }
        let file = File::open(&self.path)?;
        let mut movies = parse_csv(file)?;
        movies.sort_by_key(|m| m.id);
        Ok(movies)
    }

    fn get(&self, id: i64) -> Result<Option<Movie>> {
        Ok(self.load()?.into_iter().find(|m| m.id == id))
    }

    fn create(&mut self, movie: NewMovie) -> Result<i64> {
        let mut movies = self.load()?;
        let id = movies.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        let movie = movie.into_movie(id);
        info!(id, name = %movie.name, "Added movie");
        movies.push(movie);
        self.write(&movies)?;
        Ok(id)
    }

    fn update(&mut self, id: i64, patch: &MoviePatch) -> Result<Movie> {
        let mut movies = self.load()?;
        let movie = movies
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::NotFound { id })?;
        patch.apply(movie);
        let updated = movie.clone();

        if !patch.is_empty() {
            self.write(&movies)?;
            info!(id, fields = ?patch.changed_fields(), "Updated movie");
        }
        Ok(updated)
    }

    fn delete(&mut self, id: i64) -> Result<Movie> {
        let mut movies = self.load()?;
        let index = movies
            .iter()
            .position(|m| m.id == id)
            .ok_or(StoreError::NotFound { id })?;
        let removed = movies.remove(index);
        self.write(&movies)?;
        info!(id, name = %removed.name, "Deleted movie");
        Ok(removed)
    }

    fn replace_all(&mut self, movies: &[Movie], on_row: &mut dyn FnMut(&Movie)) -> Result<()> {
        self.write(movies)?;
        movies.iter().for_each(|movie| on_row(movie));
        info!(count = movies.len(), path = %self.path.display(), "Replaced CSV collection");
        Ok(())
    }
}

/// Parse a movie CSV
///
/// The `id` column is optional: files without it (or rows with a blank id)
/// get ids following the highest one seen, in row order. Numeric cells may
/// carry a trailing `.0`.
pub fn parse_csv<R: std::io::Read>(reader: R) -> Result<Vec<Movie>> {
    let mut reader = ReaderBuilder::new().from_reader(reader);
    let headers = reader.headers()?.clone();
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_string(), i))
        .collect();

    for column in ["name", "status", "type"] {
        if !header_map.contains_key(column) {
            return Err(StoreError::MissingColumn { column: column.to_string() });
        }
    }

    let mut parsed: Vec<(Option<i64>, Movie)> = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row = Row { record: &record, header_map: &header_map, line };
        parsed.push(row.to_movie()?);
    }

    let mut next_id = parsed.iter().filter_map(|(id, _)| *id).max().unwrap_or(0) + 1;
    let mut movies = Vec::with_capacity(parsed.len());
    for (id, mut movie) in parsed {
        movie.id = match id {
            Some(id) => id,
            None => {
                next_id += 1;
                next_id - 1
            }
        };
        movies.push(movie);
    }

    let mut seen = std::collections::HashSet::new();
    if let Some(dup) = movies.iter().find(|m| !seen.insert(m.id)) {
        return Err(StoreError::InvalidRecord {
            line: 0,
            reason: format!("duplicate id {}", dup.id),
        });
    }
    Ok(movies)
}

struct Row<'a> {
    record: &'a StringRecord,
    header_map: &'a HashMap<String, usize>,
    line: u64,
}

impl Row<'_> {
    /// Trimmed cell, `None` when the column is missing or the cell is blank
    fn cell(&self, column: &str) -> Option<&str> {
        let index = *self.header_map.get(column)?;
        self.record.get(index).map(str::trim).filter(|v| !v.is_empty())
    }

    fn invalid(&self, reason: impl Into<String>) -> StoreError {
        StoreError::InvalidRecord { line: self.line, reason: reason.into() }
    }

    fn number(&self, column: &str) -> Result<Option<i64>> {
        let Some(raw) = self.cell(column) else {
            return Ok(None);
        };
        let trimmed = raw.strip_suffix(".0").unwrap_or(raw);
        trimmed
            .parse::<i64>()
            .map(Some)
            .map_err(|_| self.invalid(format!("{column} {raw:?} is not an integer")))
    }

    fn to_movie(&self) -> Result<(Option<i64>, Movie)> {
        let name = self.cell("name").ok_or_else(|| self.invalid("name is blank"))?;
        let status: Status = self
            .cell("status")
            .unwrap_or_default()
            .parse()
            .map_err(|e: String| self.invalid(e))?;
        let media_type: MediaType = self
            .cell("type")
            .unwrap_or_default()
            .parse()
            .map_err(|e: String| self.invalid(e))?;

        let year = match self.number("year")? {
            Some(y) => {
                let y = validate::year_range()
                    .check(y)
                    .map_err(|e| self.invalid(e.to_string()))?;
                Some(i32::try_from(y).map_err(|_| self.invalid(format!("year {y} is out of range")))?)
            }
            None => None,
        };
        let rating = match self.number("rating")? {
            Some(r) => Some(validate::rating_range().check(r)? as u8),
            None => None,
        };
        let watched_date = match self.cell("watched_date") {
            Some(raw) => validate::parse_watched_date(raw)?,
            None => None,
        };

        let movie = NewMovie {
            name: name.to_string(),
            year,
            status,
            media_type,
            country: self.cell("country").map(str::to_string),
            genres: self.cell("genres").map(genre::parse).unwrap_or_default(),
            rating,
            watched_date,
            note: self.cell("note").map(str::to_string),
        };
        if !status.is_watched() && (movie.rating.is_some() || movie.watched_date.is_some()) {
            warn!(line = self.line, name, "Dropping rating and watched date of a waiting movie");
        }

        Ok((self.number("id")?, movie.into_movie(0)))
    }
}

fn to_record(movie: &Movie) -> [String; 10] {
    let opt = |value: Option<String>| value.unwrap_or_default();
    [
        movie.id.to_string(),
        movie.name.clone(),
        opt(movie.year.map(|y| y.to_string())),
        movie.status.as_str().to_string(),
        movie.media_type.as_str().to_string(),
        opt(movie.country.clone()),
        genre::join(&movie.genres),
        opt(movie.rating.map(|r| r.to_string())),
        opt(movie.watched_date.clone()),
        opt(movie.note.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_CSV: &str = "name,year,status,type,country,genres,rating,watched_date,note
Inception,2010,waiting,movie,US,\"action,sci-fi,thriller,epic\",,,
Interstella,2014,completed,movie,US,\"time travel,adventure,sci-fi,epic\",9.0,2019-5,
The Boy and the Beast,2015,waiting,movie,Japan,\"animation,adventure,fantasy\",,,
Her,2013,dropped,movie,US,\"comedy, romance ,sci-fi\",,,\"a, quoted note\"
Soul,2020,waiting,movie,US,animation,,,
";

    fn temp_store() -> (tempfile::TempDir, CsvStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("movies.csv"));
        (dir, store)
    }

    #[test]
    fn test_parse_legacy_layout_assigns_ids() {
        let movies = parse_csv(LEGACY_CSV.as_bytes()).unwrap();
        assert_eq!(movies.len(), 5);
        assert_eq!(movies[0].id, 1);
        assert_eq!(movies[4].id, 5);
        assert_eq!(movies[4].name, "Soul");
    }

    #[test]
    fn test_parse_converts_empty_cells_and_numbers() {
        let movies = parse_csv(LEGACY_CSV.as_bytes()).unwrap();
        let inception = &movies[0];
        assert_eq!(inception.rating, None);
        assert_eq!(inception.note, None);

        let interstella = &movies[1];
        assert_eq!(interstella.rating, Some(9));
        assert_eq!(interstella.watched_date.as_deref(), Some("2019-05"));

        let her = &movies[3];
        assert_eq!(her.genres, genre::parse("comedy,romance,sci-fi"));
        assert_eq!(her.note.as_deref(), Some("a, quoted note"));
    }

    #[test]
    fn test_parse_rejects_out_of_range_year() {
        let csv = "name,year,status,type\nA,1800,waiting,movie\n";
        assert!(matches!(parse_csv(csv.as_bytes()), Err(StoreError::InvalidRecord { line: 2, .. })));

        // would wrap to 2000 if narrowed without a check
        let csv = "name,year,status,type\nA,2001,waiting,movie\nB,4294969296,waiting,movie\n";
        assert!(matches!(parse_csv(csv.as_bytes()), Err(StoreError::InvalidRecord { line: 3, .. })));

        let csv = "name,year,status,type\nA,1900.0,waiting,movie\n";
        assert_eq!(parse_csv(csv.as_bytes()).unwrap()[0].year, Some(1900));
    }

    #[test]
    fn test_parse_rejects_bad_rows() {
        let csv = "name,status,type\nInception,watched,movie\n";
        assert!(matches!(parse_csv(csv.as_bytes()), Err(StoreError::InvalidRecord { line: 2, .. })));

        let csv = "name,type\nInception,movie\n";
        assert!(matches!(parse_csv(csv.as_bytes()), Err(StoreError::MissingColumn { .. })));

        let csv = "id,name,status,type\n1,A,waiting,movie\n1,B,waiting,movie\n";
        assert!(matches!(parse_csv(csv.as_bytes()), Err(StoreError::InvalidRecord { .. })));
    }

    #[test]
    fn test_blank_ids_follow_highest_id() {
        let csv = "id,name,status,type\n7,A,waiting,movie\n,B,waiting,movie\n3,C,waiting,movie\n";
        let ids: Vec<i64> = parse_csv(csv.as_bytes()).unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![7, 8, 3]);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let (_dir, store) = temp_store();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_crud_round_trip() {
        let (_dir, mut store) = temp_store();
        let id = store
            .create(NewMovie {
                year: Some(2020),
                genres: genre::parse("animation"),
                ..NewMovie::new("Soul", Status::Completed, MediaType::Movie)
            })
            .unwrap();
        assert_eq!(id, 1);
        let second = store.create(NewMovie::new("Her", Status::Waiting, MediaType::Movie)).unwrap();
        assert_eq!(second, 2);

        let patch = MoviePatch { rating: Some(Some(9)), ..MoviePatch::default() };
        store.update(1, &patch).unwrap();

        let soul = store.get(1).unwrap().unwrap();
        assert_eq!(soul.rating, Some(9));
        assert_eq!(soul.year, Some(2020));
        assert_eq!(soul.country, None);

        assert_eq!(store.delete(2).unwrap().name, "Her");
        assert_eq!(store.count().unwrap(), 1);
        assert!(matches!(store.delete(2), Err(StoreError::NotFound { id: 2 })));
        assert!(!store.path().with_extension("csv.tmp").exists());
    }

    #[test]
    fn test_written_layout() {
        let (_dir, mut store) = temp_store();
        let movies = parse_csv(LEGACY_CSV.as_bytes()).unwrap();
        store.replace_all(&movies, &mut |_| {}).unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("id,name,year,status,type,country,genres,rating,watched_date,note"));
        assert_eq!(lines.next(), Some("1,Inception,2010,waiting,movie,US,\"action,epic,sci-fi,thriller\",,,"));
        assert_eq!(store.load().unwrap(), movies);
    }

    #[test]
    fn test_distinct_values() {
        let (_dir, mut store) = temp_store();
        store.replace_all(&parse_csv(LEGACY_CSV.as_bytes()).unwrap(), &mut |_| {}).unwrap();
        assert_eq!(store.countries().unwrap(), vec!["Japan".to_string(), "US".to_string()]);
        assert!(store.genres().unwrap().contains(&"time travel".to_string()));
    }
}
