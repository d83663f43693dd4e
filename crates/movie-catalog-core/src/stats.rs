use movie_catalog_models::Movie;
use serde::Serialize;

/// Columns summarized by [`summarize`], in display order
pub const STAT_COLUMNS: [&str; 3] = ["status", "type", "country"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnStats {
    pub column: &'static str,
    pub counts: Vec<ValueCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub total: usize,
    pub columns: Vec<ColumnStats>,
}

/// Count occurrences of each present value, most frequent first
///
/// Ties keep the order in which values were first seen. Absent values are
/// not counted.
pub fn value_counts<'a, I>(values: I) -> Vec<ValueCount>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: Vec<ValueCount> = Vec::new();
    for value in values.into_iter().flatten() {
        match counts.iter_mut().find(|c| c.value == value) {
            Some(existing) => existing.count += 1,
            None => counts.push(ValueCount { value: value.to_string(), count: 1 }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Total plus value counts for status, type and country
///
/// Columns listed in `excluded` are skipped, typically the ones a filter
/// already pinned to a single value.
pub fn summarize(movies: &[Movie], excluded: &[&str]) -> CollectionStats {
    let columns = STAT_COLUMNS
        .iter()
        .filter(|column| !excluded.contains(column))
        .map(|&column| {
            let counts = match column {
                "status" => value_counts(movies.iter().map(|m| Some(m.status.as_str()))),
                "type" => value_counts(movies.iter().map(|m| Some(m.media_type.as_str()))),
                _ => value_counts(movies.iter().map(|m| m.country.as_deref())),
            };
            ColumnStats { column, counts }
        })
        .collect();

    CollectionStats {
        total: movies.len(),
        columns,
    }
}
