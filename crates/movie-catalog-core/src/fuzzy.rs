//! Exact → prefix → fuzzy resolution of identifiers such as SQL script or
//! command names.

use serde::Serialize;
use std::fmt;
use strsim::normalized_levenshtein;

use crate::error::{CatalogError, Result};

/// Minimum similarity for a fuzzy hit
pub const FUZZY_CUTOFF: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchType {
    Exact,
    Prefix,
    Fuzzy,
    None,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchType::Exact => "Exact",
            MatchType::Prefix => "Prefix",
            MatchType::Fuzzy => "Fuzzy",
            MatchType::None => "None",
        };
        f.write_str(label)
    }
}

/// Resolve `input` against `candidates`, first hit wins:
/// exact name, then the first candidate starting with `input`, then the
/// single most similar candidate above [`FUZZY_CUTOFF`].
pub fn resolve<S: AsRef<str>>(input: &str, candidates: &[S]) -> (Option<String>, MatchType) {
    if let Some(exact) = candidates.iter().find(|c| c.as_ref() == input) {
        return (Some(exact.as_ref().to_string()), MatchType::Exact);
    }

    if let Some(prefixed) = candidates.iter().find(|c| c.as_ref().starts_with(input)) {
        return (Some(prefixed.as_ref().to_string()), MatchType::Prefix);
    }

    match best_match(input, candidates, FUZZY_CUTOFF) {
        Some((name, _)) => (Some(name), MatchType::Fuzzy),
        None => (None, MatchType::None),
    }
}

/// Like [`resolve`], but refuses to pick between several prefix candidates
/// and reports a miss as an error
pub fn resolve_unique<S: AsRef<str>>(input: &str, candidates: &[S]) -> Result<(String, MatchType)> {
    if candidates.iter().any(|c| c.as_ref() == input) {
        return Ok((input.to_string(), MatchType::Exact));
    }

    let prefixed: Vec<String> = candidates
        .iter()
        .map(|c| c.as_ref())
        .filter(|c| c.starts_with(input))
        .map(str::to_string)
        .collect();
    match prefixed.len() {
        0 => {}
        1 => return Ok((prefixed[0].clone(), MatchType::Prefix)),
        _ => {
            return Err(CatalogError::AmbiguousMatch {
                input: input.to_string(),
                candidates: prefixed,
            })
        }
    }

    best_match(input, candidates, FUZZY_CUTOFF)
        .map(|(name, _)| (name, MatchType::Fuzzy))
        .ok_or_else(|| CatalogError::NoMatch { input: input.to_string() })
}

/// The most similar candidate with its score, if any reaches `cutoff`
///
/// Ties go to the candidate listed first.
pub fn best_match<S: AsRef<str>>(input: &str, candidates: &[S], cutoff: f64) -> Option<(String, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for candidate in candidates.iter().map(|c| c.as_ref()) {
        let score = normalized_levenshtein(input, candidate);
        if score < cutoff {
            continue;
        }
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }
    best.map(|(name, score)| (name.to_string(), score))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPTS: [&str; 5] = ["top_rated", "watched_by_year", "waiting_list", "genre_counts", "country_counts"];

    #[test]
    fn test_exact_match_wins() {
        assert_eq!(resolve("top_rated", &SCRIPTS), (Some("top_rated".to_string()), MatchType::Exact));
    }

    #[test]
    fn test_prefix_takes_first_candidate() {
        assert_eq!(resolve("wa", &SCRIPTS), (Some("watched_by_year".to_string()), MatchType::Prefix));
        assert_eq!(resolve("genre", &SCRIPTS), (Some("genre_counts".to_string()), MatchType::Prefix));
    }

    #[test]
    fn test_fuzzy_match() {
        assert_eq!(resolve("top_ratd", &SCRIPTS), (Some("top_rated".to_string()), MatchType::Fuzzy));
        assert_eq!(resolve("contry_counts", &SCRIPTS), (Some("country_counts".to_string()), MatchType::Fuzzy));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(resolve("zzz", &SCRIPTS), (None, MatchType::None));
        assert_eq!(resolve::<&str>("top", &[]), (None, MatchType::None));
    }

    #[test]
    fn test_resolve_unique_rejects_ambiguous_prefix() {
        let err = resolve_unique("wa", &SCRIPTS).unwrap_err();
        assert_eq!(
            err,
            CatalogError::AmbiguousMatch {
                input: "wa".to_string(),
                candidates: vec!["watched_by_year".to_string(), "waiting_list".to_string()],
            }
        );
    }

    #[test]
    fn test_resolve_unique_hits() {
        assert_eq!(resolve_unique("top_rated", &SCRIPTS).unwrap(), ("top_rated".to_string(), MatchType::Exact));
        assert_eq!(resolve_unique("watc", &SCRIPTS).unwrap(), ("watched_by_year".to_string(), MatchType::Prefix));
        assert_eq!(resolve_unique("top_ratd", &SCRIPTS).unwrap(), ("top_rated".to_string(), MatchType::Fuzzy));
        assert_eq!(
            resolve_unique("zzz", &SCRIPTS).unwrap_err(),
            CatalogError::NoMatch { input: "zzz".to_string() }
        );
    }

    #[test]
    fn test_best_match_respects_cutoff() {
        assert!(best_match("abc", &["xyz"], FUZZY_CUTOFF).is_none());
        let (name, score) = best_match("abcd", &["abce", "wxyz"], FUZZY_CUTOFF).unwrap();
        assert_eq!(name, "abce");
        assert!((score - 0.75).abs() < 1e-9);
    }
}
