use movie_catalog_models::{Movie, MoviePatch, NewMovie};

use crate::genre;

/// Persistence collaborator of the catalog
///
/// Implementations are opened per command and passed explicitly to every
/// operation. Each mutation is atomic and visible to the next `load()`.
pub trait MovieStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Short backend name for messages ("sqlite", "csv")
    fn backend_name(&self) -> &str;

    /// Whole collection, ordered by id
    fn load(&self) -> Result<Vec<Movie>, Self::Error>;

    fn get(&self, id: i64) -> Result<Option<Movie>, Self::Error>;

    /// Insert a record and return its newly assigned id
    fn create(&mut self, movie: NewMovie) -> Result<i64, Self::Error>;

    /// Apply a partial update, returning the stored result
    ///
    /// Fails with the backend's not-found error for an unknown id.
    fn update(&mut self, id: i64, patch: &MoviePatch) -> Result<Movie, Self::Error>;

    /// Remove a record (and its genre links), returning what was removed
    fn delete(&mut self, id: i64) -> Result<Movie, Self::Error>;

    /// Replace the whole collection, keeping the given ids
    ///
    /// `on_row` is called once per written record, for progress reporting.
    fn replace_all(&mut self, movies: &[Movie], on_row: &mut dyn FnMut(&Movie)) -> Result<(), Self::Error>;

    fn count(&self) -> Result<usize, Self::Error> {
        Ok(self.load()?.len())
    }

    /// Distinct non-null countries, sorted
    fn countries(&self) -> Result<Vec<String>, Self::Error> {
        let mut countries: Vec<String> = self.load()?.into_iter().filter_map(|m| m.country).collect();
        countries.sort();
        countries.dedup();
        Ok(countries)
    }

    /// Every genre tag in use, sorted
    fn genres(&self) -> Result<Vec<String>, Self::Error> {
        let movies = self.load()?;
        Ok(genre::all_genres(movies.iter().map(|m| &m.genres)).into_iter().collect())
    }
}
