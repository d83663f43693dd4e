use std::cmp::Ordering;
use std::fmt;

use movie_catalog_models::Movie;
use serde::{Deserialize, Serialize};

use crate::choice::ChoiceSet;
use crate::error::{CatalogError, Result};
use crate::genre;
use crate::sort_key::{normalize, CellValue, SortKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Id,
    Name,
    Year,
    Status,
    Type,
    Country,
    Genres,
    Rating,
    WatchedDate,
    Note,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Id,
        Column::Name,
        Column::Year,
        Column::Status,
        Column::Type,
        Column::Country,
        Column::Genres,
        Column::Rating,
        Column::WatchedDate,
        Column::Note,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Name => "name",
            Column::Year => "year",
            Column::Status => "status",
            Column::Type => "type",
            Column::Country => "country",
            Column::Genres => "genres",
            Column::Rating => "rating",
            Column::WatchedDate => "watched_date",
            Column::Note => "note",
        }
    }

    /// Resolve a column name or initial (`r` → rating, `w` → watched_date)
    pub fn resolve(input: &str) -> Result<Column> {
        let set = ChoiceSet::new(Column::ALL.iter().map(Column::as_str));
        let name = set.resolve_strict(input)?;
        Column::ALL
            .into_iter()
            .find(|c| c.as_str() == name)
            .ok_or_else(|| CatalogError::InvalidChoice {
                value: input.trim().to_string(),
                choices: set.choices().to_vec(),
            })
    }

    /// Best ratings first, oldest watches first, everything else ascending
    pub fn default_direction(&self) -> SortDirection {
        match self {
            Column::Rating => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }

    pub fn cell(&self, movie: &Movie) -> CellValue {
        match self {
            Column::Id => CellValue::Int(movie.id),
            Column::Name => CellValue::Text(movie.name.clone()),
            Column::Year => movie.year.map(i64::from).into(),
            Column::Status => movie.status.as_str().into(),
            Column::Type => movie.media_type.as_str().into(),
            Column::Country => movie.country.clone().into(),
            Column::Genres => {
                if movie.genres.is_empty() {
                    CellValue::Null
                } else {
                    CellValue::Text(genre::join(&movie.genres))
                }
            }
            Column::Rating => movie.rating.map(i64::from).into(),
            Column::WatchedDate => movie.watched_date.clone().into(),
            Column::Note => movie.note.clone().into(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Compare two keys in the given direction
///
/// Missing values stay at the end whichever way the column is sorted.
pub fn compare_keys(a: &SortKey, b: &SortKey, direction: SortDirection) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match direction {
            SortDirection::Ascending => a.cmp(b),
            SortDirection::Descending => b.cmp(a),
        },
    }
}

/// Stable sort of a collection by one column
pub fn sort_by_column(movies: Vec<Movie>, column: Column, direction: SortDirection) -> Vec<Movie> {
    let mut keyed: Vec<(SortKey, Movie)> = movies
        .into_iter()
        .map(|movie| (normalize(&column.cell(&movie)), movie))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, direction));
    keyed.into_iter().map(|(_, movie)| movie).collect()
}
