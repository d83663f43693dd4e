//! Parsing of raw user input into record fields.
//!
//! Everything here runs at the input boundary (prompts, command flags);
//! values that reach the store or the filter engine are already valid.

use chrono::{Datelike, Local};
use movie_catalog_models::PartialDate;

use crate::error::{CatalogError, Result};

pub const MIN_YEAR: i32 = 1900;
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

pub fn current_year() -> i32 {
    Local::now().year()
}

/// Integer parser with optional bounds
///
/// Blank input is `None` unless the field is required. Out-of-range values
/// are rejected, or pulled to the nearest bound when clamping is enabled.
#[derive(Debug, Clone)]
pub struct IntRange {
    field: String,
    min: Option<i64>,
    max: Option<i64>,
    clamp: bool,
    allow_blank: bool,
}

impl IntRange {
    pub fn new(field: impl Into<String>, min: Option<i64>, max: Option<i64>) -> Self {
        Self {
            field: field.into(),
            min,
            max,
            clamp: false,
            allow_blank: true,
        }
    }

    pub fn clamped(mut self) -> Self {
        self.clamp = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.allow_blank = false;
        self
    }

    pub fn parse(&self, input: &str) -> Result<Option<i64>> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            if self.allow_blank {
                return Ok(None);
            }
            return Err(CatalogError::Blank { field: self.field.clone() });
        }

        let value: i64 = trimmed.parse().map_err(|_| CatalogError::NotAnInteger {
            field: self.field.clone(),
            value: trimmed.to_string(),
        })?;

        self.check(value).map(Some)
    }

    /// Apply the bounds to an already numeric value
    pub fn check(&self, value: i64) -> Result<i64> {
        let below = self.min.is_some_and(|min| value < min);
        let above = self.max.is_some_and(|max| value > max);
        if !below && !above {
            return Ok(value);
        }

        if self.clamp {
            return Ok(if below { self.min } else { self.max }.unwrap_or(value));
        }

        Err(CatalogError::OutOfRange {
            field: self.field.clone(),
            value,
            min: self.min.unwrap_or(i64::MIN),
            max: self.max.unwrap_or(i64::MAX),
        })
    }
}

/// Release years run from 1900 to the current year
pub fn year_range() -> IntRange {
    IntRange::new("year", Some(MIN_YEAR.into()), Some(current_year().into()))
}

/// Ratings are clamped into 1..=10
pub fn rating_range() -> IntRange {
    IntRange::new("rating", Some(MIN_RATING.into()), Some(MAX_RATING.into())).clamped()
}

pub fn parse_year(input: &str) -> Result<Option<i32>> {
    // bounds keep the value well inside i32
    Ok(year_range().parse(input)?.map(|y| y as i32))
}

pub fn parse_rating(input: &str) -> Result<Option<u8>> {
    Ok(rating_range().parse(input)?.map(|r| r as u8))
}

/// Validate a watched date, returning it zero padded (`2024-3` → `2024-03`)
pub fn parse_watched_date(input: &str) -> Result<Option<String>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    PartialDate::parse(trimmed)
        .map(|date| Some(date.to_string()))
        .ok_or_else(|| CatalogError::MalformedDate { value: trimmed.to_string() })
}

pub fn parse_name(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::Blank { field: "name".to_string() });
    }
    Ok(trimmed.to_string())
}

/// Trimmed free text, blank meaning absent
pub fn optional_text(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_date() {
        assert_eq!(parse_watched_date("2025").unwrap().as_deref(), Some("2025"));
        assert_eq!(parse_watched_date("2025-12").unwrap().as_deref(), Some("2025-12"));
        assert_eq!(parse_watched_date("2025-12-06").unwrap().as_deref(), Some("2025-12-06"));
        assert_eq!(parse_watched_date(" 2025-1-6 ").unwrap().as_deref(), Some("2025-01-06"));
    }

    #[test]
    fn test_valid_date_with_empty_input() {
        assert_eq!(parse_watched_date("").unwrap(), None);
        assert_eq!(parse_watched_date("  ").unwrap(), None);
    }

    #[test]
    fn test_invalid_date() {
        assert_eq!(
            parse_watched_date("202").unwrap_err(),
            CatalogError::MalformedDate { value: "202".to_string() }
        );
        assert!(parse_watched_date("2025/12/06").is_err());
    }

    #[test]
    fn test_rating_is_clamped() {
        assert_eq!(parse_rating("11").unwrap(), Some(10));
        assert_eq!(parse_rating("0").unwrap(), Some(1));
        assert_eq!(parse_rating("-4").unwrap(), Some(1));
        assert_eq!(parse_rating(" 7 ").unwrap(), Some(7));
        assert_eq!(parse_rating("").unwrap(), None);
    }

    #[test]
    fn test_unclamped_range_rejects() {
        let range = IntRange::new("rating", Some(1), Some(10));
        assert_eq!(
            range.parse("11").unwrap_err(),
            CatalogError::OutOfRange { field: "rating".to_string(), value: 11, min: 1, max: 10 }
        );
        assert_eq!(range.check(10).unwrap(), 10);
    }

    #[test]
    fn test_year_bounds() {
        assert_eq!(parse_year("1999").unwrap(), Some(1999));
        assert!(matches!(parse_year("1899"), Err(CatalogError::OutOfRange { .. })));
        let next = (current_year() + 1).to_string();
        assert!(matches!(parse_year(&next), Err(CatalogError::OutOfRange { .. })));
    }

    #[test]
    fn test_not_an_integer() {
        assert_eq!(
            parse_year("abc").unwrap_err(),
            CatalogError::NotAnInteger { field: "year".to_string(), value: "abc".to_string() }
        );
    }

    #[test]
    fn test_required_field() {
        let range = IntRange::new("year", None, None).required();
        assert_eq!(range.parse(" ").unwrap_err(), CatalogError::Blank { field: "year".to_string() });
        assert_eq!(range.parse("42").unwrap(), Some(42));
    }

    #[test]
    fn test_name_and_text() {
        assert_eq!(parse_name("  Soul ").unwrap(), "Soul");
        assert!(parse_name("   ").is_err());
        assert_eq!(optional_text("  "), None);
        assert_eq!(optional_text(" hi "), Some("hi".to_string()));
    }
}
