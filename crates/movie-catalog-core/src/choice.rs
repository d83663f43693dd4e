//! Resolution of free-text input against a fixed set of allowed values.
//!
//! A value matches a choice when it equals the choice ignoring case and
//! surrounding whitespace, or when it is the choice's initial letter. Nothing
//! else is accepted: `"ab"` does not match `"abc"`.
//!
//! When several choices share an initial, the first registered choice owns
//! it, and a full name always beats an initial (`"a"` resolves to a choice
//! literally named `"a"` before any choice merely starting with `a`).

use std::collections::HashMap;

use crate::error::{CatalogError, Result};

#[derive(Debug, Clone)]
pub struct ChoiceSet {
    choices: Vec<String>,
    lookup: HashMap<String, usize>,
}

impl ChoiceSet {
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let choices: Vec<String> = choices
            .into_iter()
            .map(Into::into)
            .filter(|c| !c.trim().is_empty())
            .collect();

        let mut lookup = HashMap::new();
        for (index, choice) in choices.iter().enumerate() {
            lookup.entry(choice.to_lowercase()).or_insert(index);
        }
        for (index, choice) in choices.iter().enumerate() {
            if let Some(initial) = initial_of(choice) {
                lookup.entry(initial).or_insert(index);
            }
        }

        Self { choices, lookup }
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Lenient lookup: `None` when the input matches nothing
    pub fn resolve(&self, input: &str) -> Option<&str> {
        let key = input.trim().to_lowercase();
        self.lookup.get(&key).map(|&index| self.choices[index].as_str())
    }

    /// Strict lookup: an unmatched input is an `InvalidChoice`
    pub fn resolve_strict(&self, input: &str) -> Result<&str> {
        self.resolve(input).ok_or_else(|| CatalogError::InvalidChoice {
            value: input.trim().to_string(),
            choices: self.choices.clone(),
        })
    }

    /// Initials shared by more than one choice, with every choice sharing it
    /// in registration order (the first one is the one that resolves)
    pub fn colliding_initials(&self) -> Vec<(String, Vec<&str>)> {
        let mut groups: Vec<(String, Vec<&str>)> = Vec::new();
        for choice in &self.choices {
            let Some(initial) = initial_of(choice) else { continue };
            match groups.iter_mut().find(|(i, _)| *i == initial) {
                Some((_, members)) => members.push(choice.as_str()),
                None => groups.push((initial, vec![choice.as_str()])),
            }
        }
        groups.retain(|(_, members)| members.len() > 1);
        groups
    }
}

fn initial_of(choice: &str) -> Option<String> {
    choice.chars().next().map(|c| c.to_lowercase().collect())
}

/// One-shot resolution without keeping a [`ChoiceSet`] around
///
/// Returns `Ok(None)` for an unmatched input unless `strict` is set, in which
/// case the miss is reported as [`CatalogError::InvalidChoice`].
pub fn resolve_choice<S: AsRef<str>>(input: &str, choices: &[S], strict: bool) -> Result<Option<String>> {
    let set = ChoiceSet::new(choices.iter().map(|c| c.as_ref()));
    if strict {
        set.resolve_strict(input).map(|c| Some(c.to_string()))
    } else {
        Ok(set.resolve(input).map(str::to_string))
    }
}
