use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A set of known English words, stored lowercase.
///
/// Only membership is tracked. Callers own it and share it read-only across
/// a batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lexicon {
    words: HashSet<String>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a word list with one entry per line. Blank lines and lines
    /// starting with `#` are skipped.
    pub fn parse(list: &str) -> Self {
        list.lines()
            .map(str::trim)
            .filter(|l| !l.starts_with('#'))
            .collect()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.words.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Lexicon {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let words = iter
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }
}
