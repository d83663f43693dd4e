use thiserror::Error;

use movie_catalog_models::DATE_FORMATS;

/// Rejections raised while turning user input into catalog values
///
/// The filter engine never produces these: unresolvable filter values
/// simply match nothing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("{value:?} is not one of {} or their initials", quote_all(.choices))]
    InvalidChoice { value: String, choices: Vec<String> },

    #[error("{field} {value} is out of range, expected {min} to {max}")]
    OutOfRange { field: String, value: i64, min: i64, max: i64 },

    #[error("{value:?} does not match the formats {}", quote_all(DATE_FORMATS))]
    MalformedDate { value: String },

    #[error("No movie with id {id}")]
    NotFound { id: i64 },

    #[error("{input:?} is ambiguous, it could be: {}", .candidates.join(", "))]
    AmbiguousMatch { input: String, candidates: Vec<String> },

    #[error("Nothing matches {input:?}")]
    NoMatch { input: String },

    #[error("{field} cannot be blank")]
    Blank { field: String },

    #[error("{field}: {value:?} must be an integer")]
    NotAnInteger { field: String, value: String },
}

pub type Result<T> = std::result::Result<T, CatalogError>;

fn quote_all<S: AsRef<str>>(values: impl IntoIterator<Item = S>) -> String {
    values
        .into_iter()
        .map(|v| format!("'{}'", v.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}
