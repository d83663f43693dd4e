use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::media::MediaType;
use crate::status::Status;

/// A record of the collection as the storage layer hands it out
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: i64,
    pub name: String,
    pub year: Option<i32>,
    pub status: Status,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub country: Option<String>,
    pub genres: BTreeSet<String>,
    pub rating: Option<u8>, // 1-10
    pub watched_date: Option<String>, // YYYY, YYYY-MM or YYYY-MM-DD
    pub note: Option<String>,
}

impl Movie {
    /// Rating and watched date only exist for watched records
    fn clear_unwatched_fields(&mut self) {
        if !self.status.is_watched() {
            self.rating = None;
            self.watched_date = None;
        }
    }
}

/// Input of the Add operation; the store assigns the id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NewMovie {
    pub name: String,
    pub year: Option<i32>,
    pub status: Status,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub country: Option<String>,
    pub genres: BTreeSet<String>,
    pub rating: Option<u8>,
    pub watched_date: Option<String>,
    pub note: Option<String>,
}

impl NewMovie {
    pub fn new(name: impl Into<String>, status: Status, media_type: MediaType) -> Self {
        Self {
            name: name.into(),
            status,
            media_type,
            ..Self::default()
        }
    }

    pub fn into_movie(self, id: i64) -> Movie {
        let mut movie = Movie {
            id,
            name: self.name,
            year: self.year,
            status: self.status,
            media_type: self.media_type,
            country: self.country,
            genres: self.genres,
            rating: self.rating,
            watched_date: self.watched_date,
            note: self.note,
        };
        movie.clear_unwatched_fields();
        movie
    }
}

impl From<Movie> for NewMovie {
    fn from(movie: Movie) -> Self {
        Self {
            name: movie.name,
            year: movie.year,
            status: movie.status,
            media_type: movie.media_type,
            country: movie.country,
            genres: movie.genres,
            rating: movie.rating,
            watched_date: movie.watched_date,
            note: movie.note,
        }
    }
}

/// Partial update of a record
///
/// `None` leaves a field untouched. For nullable fields `Some(None)` clears
/// the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoviePatch {
    pub name: Option<String>,
    pub year: Option<Option<i32>>,
    pub status: Option<Status>,
    pub media_type: Option<MediaType>,
    pub country: Option<Option<String>>,
    pub genres: Option<BTreeSet<String>>,
    pub rating: Option<Option<u8>>,
    pub watched_date: Option<Option<String>>,
    pub note: Option<Option<String>>,
}

impl MoviePatch {
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    /// Column names touched by this patch, in schema order
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.year.is_some() {
            fields.push("year");
        }
        if self.status.is_some() {
            fields.push("status");
        }
        if self.media_type.is_some() {
            fields.push("type");
        }
        if self.country.is_some() {
            fields.push("country");
        }
        if self.genres.is_some() {
            fields.push("genres");
        }
        if self.rating.is_some() {
            fields.push("rating");
        }
        if self.watched_date.is_some() {
            fields.push("watched_date");
        }
        if self.note.is_some() {
            fields.push("note");
        }
        fields
    }

    pub fn apply(&self, movie: &mut Movie) {
        if let Some(name) = &self.name {
            movie.name = name.clone();
        }
        if let Some(year) = self.year {
            movie.year = year;
        }
        if let Some(status) = self.status {
            movie.status = status;
        }
        if let Some(media_type) = self.media_type {
            movie.media_type = media_type;
        }
        if let Some(country) = &self.country {
            movie.country = country.clone();
        }
        if let Some(genres) = &self.genres {
            movie.genres = genres.clone();
        }
        if let Some(rating) = self.rating {
            movie.rating = rating;
        }
        if let Some(watched_date) = &self.watched_date {
            movie.watched_date = watched_date.clone();
        }
        if let Some(note) = &self.note {
            movie.note = note.clone();
        }
        movie.clear_unwatched_fields();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed_movie() -> Movie {
        NewMovie {
            year: Some(2020),
            rating: Some(9),
            watched_date: Some("2021-01".to_string()),
            note: Some("great".to_string()),
            ..NewMovie::new("Soul", Status::Completed, MediaType::Movie)
        }
        .into_movie(5)
    }

    #[test]
    fn test_new_waiting_movie_drops_rating_and_date() {
        let movie = NewMovie {
            rating: Some(7),
            watched_date: Some("2024".to_string()),
            ..NewMovie::new("Her", Status::Waiting, MediaType::Movie)
        }
        .into_movie(1);

        assert_eq!(movie.rating, None);
        assert_eq!(movie.watched_date, None);
    }

    #[test]
    fn test_patch_leaves_unspecified_fields() {
        let mut movie = completed_movie();
        let patch = MoviePatch {
            note: Some(Some("updated note :)".to_string())),
            ..MoviePatch::default()
        };
        patch.apply(&mut movie);

        assert_eq!(movie.note.as_deref(), Some("updated note :)"));
        assert_eq!(movie.name, "Soul");
        assert_eq!(movie.rating, Some(9));
        assert_eq!(patch.changed_fields(), vec!["note"]);
    }

    #[test]
    fn test_patch_clears_nullable_field() {
        let mut movie = completed_movie();
        MoviePatch { year: Some(None), ..MoviePatch::default() }.apply(&mut movie);
        assert_eq!(movie.year, None);
    }

    #[test]
    fn test_patch_back_to_waiting_clears_watch_fields() {
        let mut movie = completed_movie();
        MoviePatch { status: Some(Status::Waiting), ..MoviePatch::default() }.apply(&mut movie);

        assert_eq!(movie.status, Status::Waiting);
        assert_eq!(movie.rating, None);
        assert_eq!(movie.watched_date, None);
        assert_eq!(movie.note.as_deref(), Some("great"));
    }

    #[test]
    fn test_empty_patch() {
        assert!(MoviePatch::default().is_empty());
        assert!(!MoviePatch { rating: Some(None), ..MoviePatch::default() }.is_empty());
    }

    #[test]
    fn test_movie_serializes_type_field() {
        let json = serde_json::to_value(completed_movie()).unwrap();
        assert_eq!(json["type"], "movie");
        assert_eq!(json["status"], "completed");
    }
}
