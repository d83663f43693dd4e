// Predicate-based filtering of an in-memory collection

use movie_catalog_models::{MediaType, Movie, Status, DEFAULT_COUNTRIES};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::choice::ChoiceSet;
use crate::genre;

/// Filter options, all optional and combined with AND
///
/// Choice fields (`status`, `media_type`, `country`) hold raw user input and
/// are resolved leniently; blank strings count as "not given".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub status: Option<String>,
    pub media_type: Option<String>,
    pub country: Option<String>,
    pub genres: Option<Vec<String>>,
    pub rating: Option<u8>,
    pub watched_year: Option<String>,
    pub note_contains: Option<String>,
}

impl FilterConfig {
    /// Whether at least one option would narrow the collection
    pub fn is_active(&self) -> bool {
        non_blank(&self.name).is_some()
            || self.year.is_some()
            || non_blank(&self.status).is_some()
            || non_blank(&self.media_type).is_some()
            || non_blank(&self.country).is_some()
            || !self.requested_genres().is_empty()
            || self.rating.is_some()
            || non_blank(&self.watched_year).is_some()
            || non_blank(&self.note_contains).is_some()
    }

    /// Requested genre tags, trimmed, without empties
    pub fn requested_genres(&self) -> Vec<String> {
        self.genres
            .iter()
            .flatten()
            .map(|g| g.trim())
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Fields whose value is pinned by a choice filter, so per-column
    /// statistics can leave them out
    pub fn pinned_columns(&self) -> Vec<&'static str> {
        let mut pinned = Vec::new();
        if non_blank(&self.status).is_some() {
            pinned.push("status");
        }
        if non_blank(&self.media_type).is_some() {
            pinned.push("type");
        }
        if non_blank(&self.country).is_some() {
            pinned.push("country");
        }
        pinned
    }
}

/// How the genre option is evaluated for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenreRule {
    Off,
    /// Requested tags must all be record tags
    Exact,
    /// Requested tags must all be substrings of record tags
    Partial,
}

#[derive(Debug, Clone)]
pub struct FilterEngine {
    statuses: ChoiceSet,
    types: ChoiceSet,
    countries: ChoiceSet,
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTRIES)
    }
}

impl FilterEngine {
    pub fn new<I, S>(countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            statuses: ChoiceSet::new(Status::NAMES),
            types: ChoiceSet::new(MediaType::NAMES),
            countries: ChoiceSet::new(countries),
        }
    }

    pub fn countries(&self) -> &ChoiceSet {
        &self.countries
    }

    /// Pick the genre rule for a whole collection
    ///
    /// The exact rule is used unless it matches no record at all, in which
    /// case every record is judged by the partial rule instead.
    pub fn genre_rule(&self, collection: &[Movie], requested: &[String]) -> GenreRule {
        if requested.is_empty() {
            return GenreRule::Off;
        }
        if collection.iter().any(|m| genre::matches(&m.genres, requested)) {
            return GenreRule::Exact;
        }
        debug!(requested = ?requested, "No exact genre match in collection, falling back to partial matching");
        GenreRule::Partial
    }

    /// Select the records matching every active option, in collection order
    ///
    /// Never fails. With no active option at all the result is empty rather
    /// than the whole collection.
    pub fn apply(&self, collection: &[Movie], config: &FilterConfig) -> Vec<Movie> {
        if !config.is_active() {
            debug!(total = collection.len(), "No active filter, returning nothing");
            return Vec::new();
        }

        let requested_genres = config.requested_genres();
        let genre_rule = self.genre_rule(collection, &requested_genres);

        let predicate = Predicate {
            name: non_blank(&config.name).map(str::to_lowercase),
            year: config.year,
            status: resolve(&self.statuses, &config.status),
            media_type: resolve(&self.types, &config.media_type),
            country: resolve(&self.countries, &config.country),
            requested_genres,
            rating: config.rating,
            watched_year: non_blank(&config.watched_year),
            note: non_blank(&config.note_contains).map(str::to_lowercase),
            genre_rule,
        };

        let selected: Vec<Movie> = collection
            .iter()
            .filter(|movie| predicate.matches(movie))
            .cloned()
            .collect();

        debug!(
            matched = selected.len(),
            total = collection.len(),
            genre_rule = ?predicate.genre_rule,
            "Applied filters"
        );
        selected
    }
}

/// Filter with the built-in status, type and country choices
pub fn apply(collection: &[Movie], config: &FilterConfig) -> Vec<Movie> {
    FilterEngine::default().apply(collection, config)
}

/// A choice option after resolution: `None` means not given, `Some(None)`
/// means given but unresolvable (matches nothing)
type Resolved<'a> = Option<Option<&'a str>>;

struct Predicate<'a> {
    name: Option<String>,
    year: Option<i32>,
    status: Resolved<'a>,
    media_type: Resolved<'a>,
    country: Resolved<'a>,
    requested_genres: Vec<String>,
    rating: Option<u8>,
    watched_year: Option<&'a str>,
    note: Option<String>,
    genre_rule: GenreRule,
}

impl Predicate<'_> {
    fn matches(&self, movie: &Movie) -> bool {
        if let Some(name) = &self.name {
            if !movie.name.to_lowercase().contains(name) {
                return false;
            }
        }
        if self.year.is_some() && movie.year != self.year {
            return false;
        }
        if !choice_matches(self.status, Some(movie.status.as_str()))
            || !choice_matches(self.media_type, Some(movie.media_type.as_str()))
            || !choice_matches(self.country, movie.country.as_deref())
        {
            return false;
        }
        let genres_ok = match self.genre_rule {
            GenreRule::Off => true,
            GenreRule::Exact => genre::matches(&movie.genres, &self.requested_genres),
            GenreRule::Partial => genre::matches_partial(&movie.genres, &self.requested_genres),
        };
        if !genres_ok {
            return false;
        }
        if self.rating.is_some() && movie.rating != self.rating {
            return false;
        }
        if let Some(prefix) = self.watched_year {
            if !movie.watched_date.as_deref().is_some_and(|d| d.starts_with(prefix)) {
                return false;
            }
        }
        if let Some(note) = &self.note {
            if !movie.note.as_deref().is_some_and(|n| n.to_lowercase().contains(note)) {
                return false;
            }
        }
        true
    }
}

fn choice_matches(resolved: Resolved<'_>, actual: Option<&str>) -> bool {
    match resolved {
        None => true,
        Some(None) => false,
        Some(Some(wanted)) => actual == Some(wanted),
    }
}

fn resolve<'a>(set: &'a ChoiceSet, input: &Option<String>) -> Resolved<'a> {
    non_blank(input).map(|value| set.resolve(value))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
