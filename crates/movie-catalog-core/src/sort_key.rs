//! Type-safe sort keys for columns that mix numbers, percentages, dates,
//! free text and missing values.
//!
//! Every cell is mapped to a [`SortKey`] whose variant order is the type
//! priority, so two keys never need a cross-type comparison:
//!
//! | priority | variant      | payload                               |
//! |----------|--------------|---------------------------------------|
//! | 0        | `Numeric`    | the value as `f64`                    |
//! | 1        | `Percentage` | the number in front of `%`            |
//! | 2        | `Date`       | the original `YYYY[-MM[-DD]]` string  |
//! | 3        | `Text`       | the lowercased string                 |
//! | 4        | `Null`       | nothing                               |

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use movie_catalog_models::PartialDate;

/// A raw scalar cell, before normalization
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

/// Missing values render as an empty string
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(value) => write!(f, "{value}"),
            CellValue::Float(value) => write!(f, "{value}"),
            CellValue::Text(value) => f.write_str(value),
            CellValue::Null => Ok(()),
        }
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

#[derive(Debug, Clone)]
pub enum SortKey {
    Numeric(f64),
    Percentage(f64),
    Date(String),
    Text(String),
    Null,
}

impl SortKey {
    pub fn priority(&self) -> u8 {
        match self {
            SortKey::Numeric(_) => 0,
            SortKey::Percentage(_) => 1,
            SortKey::Date(_) => 2,
            SortKey::Text(_) => 3,
            SortKey::Null => 4,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SortKey::Null)
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Numeric(a), SortKey::Numeric(b)) | (SortKey::Percentage(a), SortKey::Percentage(b)) => {
                a.total_cmp(b)
            }
            (SortKey::Date(a), SortKey::Date(b)) | (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.priority().cmp(&other.priority()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

/// Map a cell to its sort key
pub fn normalize(value: &CellValue) -> SortKey {
    match value {
        CellValue::Null => SortKey::Null,
        CellValue::Int(v) => SortKey::Numeric(*v as f64),
        CellValue::Float(v) => SortKey::Numeric(*v),
        CellValue::Text(text) => normalize_text(text),
    }
}

fn normalize_text(text: &str) -> SortKey {
    // "85%" must be caught before the date and text rules see it
    if let Some(number) = text.strip_suffix('%') {
        if let Ok(parsed) = number.trim_end_matches('%').trim().parse::<f64>() {
            return SortKey::Percentage(parsed);
        }
    }

    if PartialDate::parse(text).is_some() {
        return SortKey::Date(text.to_string());
    }

    SortKey::Text(text.to_lowercase())
}
