use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Accepted watched-date layouts, in the order they are tried
pub const DATE_FORMATS: [&str; 3] = ["YYYY", "YYYY-MM", "YYYY-MM-DD"];

/// A date known to year, month or day precision
///
/// Formatting is zero padded, so the string form of two dates of the same
/// precision orders the same way as the dates themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PartialDate {
    Year(i32),
    YearMonth(i32, u32),
    Day(NaiveDate),
}

impl PartialDate {
    /// Parse `YYYY`, `YYYY-MM` or `YYYY-MM-DD` (month and day may drop the
    /// leading zero). Returns `None` for anything else, including impossible
    /// calendar dates such as `2023-02-30`.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split('-');
        let year = parse_year(parts.next()?)?;

        let month = match parts.next() {
            None => return Some(PartialDate::Year(year)),
            Some(part) => parse_small(part)?,
        };
        if !(1..=12).contains(&month) {
            return None;
        }

        let day = match parts.next() {
            None => return Some(PartialDate::YearMonth(year, month)),
            Some(part) => parse_small(part)?,
        };
        if parts.next().is_some() {
            return None;
        }

        NaiveDate::from_ymd_opt(year, month, day).map(PartialDate::Day)
    }

    pub fn year(&self) -> i32 {
        match self {
            PartialDate::Year(year) | PartialDate::YearMonth(year, _) => *year,
            PartialDate::Day(date) => date.year(),
        }
    }
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartialDate::Year(year) => write!(f, "{:04}", year),
            PartialDate::YearMonth(year, month) => write!(f, "{:04}-{:02}", year, month),
            PartialDate::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

fn parse_year(part: &str) -> Option<i32> {
    if part.len() != 4 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn parse_small(part: &str) -> Option<u32> {
    if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}
