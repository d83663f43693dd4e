use std::collections::BTreeSet;

/// Split a comma separated genre list into a normalized set
///
/// Segments are trimmed, empty ones dropped and duplicates merged, so
/// `" action, romance , ,, comedy "` becomes `{action, comedy, romance}`.
pub fn parse(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

/// Same as [`parse`] but keeps first-seen order, for echoing user input back
pub fn parse_ordered(raw: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    raw.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty() && seen.insert(g.to_string()))
        .map(str::to_string)
        .collect()
}

/// Storage form of a genre set: comma joined, no padding
pub fn join(genres: &BTreeSet<String>) -> String {
    genres.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

/// Strict rule: every requested tag is one of the record's tags
pub fn matches<S: AsRef<str>>(record_genres: &BTreeSet<String>, requested: &[S]) -> bool {
    requested.iter().all(|g| record_genres.contains(g.as_ref()))
}

/// Lenient rule: every requested tag appears, ignoring case, inside at least
/// one of the record's tags ("com" finds "comedy")
pub fn matches_partial<S: AsRef<str>>(record_genres: &BTreeSet<String>, requested: &[S]) -> bool {
    requested.iter().all(|wanted| {
        let wanted = wanted.as_ref().to_lowercase();
        record_genres.iter().any(|g| g.to_lowercase().contains(&wanted))
    })
}

/// Every distinct tag across a collection, sorted
pub fn all_genres<'a>(sets: impl IntoIterator<Item = &'a BTreeSet<String>>) -> BTreeSet<String> {
    sets.into_iter().flat_map(|s| s.iter().cloned()).collect()
}
