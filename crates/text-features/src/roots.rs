use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{Stemmer, TextRecord, Tokenizer};

static DEFAULT_EXTRACTOR: Lazy<RootExtractor> = Lazy::new(RootExtractor::with_default_stemmer);

/// Pulls candidate English roots out of hybrid tokens such as `save'ledim`.
///
/// Stemming goes through an optional injected [`Stemmer`]. When none is
/// present (or it reports itself unavailable) roots are only lowercased.
#[derive(Clone)]
pub struct RootExtractor {
    tokenizer: Tokenizer,
    stemmer: Option<Arc<dyn Stemmer>>,
}

impl std::fmt::Debug for RootExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootExtractor")
            .field("tokenizer", &self.tokenizer)
            .field("stemming_available", &self.stemming_available())
            .finish()
    }
}

impl Default for RootExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RootExtractor {
    /// Extractor without a stemmer.
    pub fn new() -> Self {
        Self { tokenizer: Tokenizer::root(), stemmer: None }
    }

    pub fn with_stemmer(stemmer: impl Stemmer + 'static) -> Self {
        Self { tokenizer: Tokenizer::root(), stemmer: Some(Arc::new(stemmer)) }
    }

    /// English Snowball stemmer when the `stemming` feature is enabled,
    /// otherwise no stemmer.
    pub fn with_default_stemmer() -> Self {
        #[cfg(feature = "stemming")]
        {
            Self::with_stemmer(crate::SnowballStemmer::english())
        }
        #[cfg(not(feature = "stemming"))]
        {
            Self::new()
        }
    }

    pub fn stemming_available(&self) -> bool {
        self.stemmer.as_ref().is_some_and(|s| s.is_available())
    }

    /// Roots in text order, duplicates kept. Never fails: without a usable
    /// stemmer each token is just lowercased.
    pub fn extract_roots(&self, text: &str, use_stemming: bool) -> Vec<String> {
        let tokens = self.tokenizer.tokenize(text);
        if tokens.is_empty() {
            return Vec::new();
        }
        let stemmer = self.stemmer.as_deref().filter(|s| use_stemming && s.is_available());
        tokens
            .into_iter()
            .map(|tok| {
                let lower = tok.to_lowercase();
                match stemmer {
                    Some(s) => s.stem(&lower),
                    None => lower,
                }
            })
            .collect()
    }

    /// One row per record, in input order. Missing text yields no roots.
    pub fn roots_batch(&self, records: &[TextRecord], use_stemming: bool) -> Vec<RootRow> {
        if use_stemming && !self.stemming_available() {
            tracing::warn!(
                "stemming requested but no stemmer is available; roots are lowercased only"
            );
        }
        tracing::debug!(records = records.len(), use_stemming, "roots batch");
        records
            .par_iter()
            .map(|rec| {
                let text = rec.text_or_empty();
                let roots = self.extract_roots(text, use_stemming);
                RootRow {
                    id: rec.id.clone(),
                    text: text.to_owned(),
                    root_count: distinct_root_count(&roots),
                    english_roots: roots,
                }
            })
            .collect()
    }
}

/// Root extraction with the default extractor (see
/// [`RootExtractor::with_default_stemmer`]).
pub fn extract_english_roots(text: &str, use_stemming: bool) -> Vec<String> {
    DEFAULT_EXTRACTOR.extract_roots(text, use_stemming)
}

/// Number of distinct roots.
pub fn distinct_root_count(roots: &[String]) -> usize {
    roots.iter().map(String::as_str).collect::<HashSet<_>>().len()
}

/// One output row of [`RootExtractor::roots_batch`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    pub english_roots: Vec<String>,
    /// Count of distinct entries in `english_roots`.
    pub root_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Unstemmed;

    struct ChopEd;

    impl Stemmer for ChopEd {
        fn stem(&self, word: &str) -> String {
            word.strip_suffix("ed").unwrap_or(word).to_owned()
        }
    }

    #[test]
    fn unstemmed_roots_are_lowercased_fragments() {
        let roots = RootExtractor::new().extract_roots("Bugün like'ladım ve save'ledim.", false);
        assert_eq!(roots, vec!["bug", "like'lad", "ve", "save'ledim"]);
    }

    #[test]
    fn empty_and_fragmentless_text() {
        let ex = RootExtractor::new();
        assert!(ex.extract_roots("", true).is_empty());
        assert!(ex.extract_roots("ş ğ 1 2 3 a", true).is_empty());
    }

    #[test]
    fn injected_stemmer_sees_lowercased_tokens() {
        let ex = RootExtractor::with_stemmer(ChopEd);
        assert!(ex.stemming_available());
        assert_eq!(ex.extract_roots("LIKED Saved", true), vec!["lik", "sav"]);
        assert_eq!(ex.extract_roots("LIKED Saved", false), vec!["liked", "saved"]);
    }

    #[test]
    fn unavailable_stemmer_degrades_to_lowercase() {
        let ex = RootExtractor::with_stemmer(Unstemmed);
        assert!(!ex.stemming_available());
        assert_eq!(ex.extract_roots("Following FOLLOWERS", true), vec!["following", "followers"]);
        assert!(!RootExtractor::new().stemming_available());
    }

    #[cfg(feature = "stemming")]
    #[test]
    fn default_extractor_stems_with_snowball() {
        assert_eq!(extract_english_roots("Following followers", true), vec!["follow", "follow"]);
        assert_eq!(
            extract_english_roots("Following followers", false),
            vec!["following", "followers"]
        );
    }

    #[test]
    fn distinct_count_ignores_repeats() {
        let roots: Vec<String> =
            ["like", "save", "like", "ve"].iter().map(|s| s.to_string()).collect();
        assert_eq!(distinct_root_count(&roots), 3);
        assert_eq!(distinct_root_count(&[]), 0);
    }

    #[test]
    fn batch_rows_follow_input() {
        let records = vec![
            TextRecord::new("like like LIKE save"),
            TextRecord::default(),
            TextRecord::with_id("v3", Some("follow'la".into())),
        ];
        let rows = RootExtractor::new().roots_batch(&records, true);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].english_roots, vec!["like", "like", "like", "save"]);
        assert_eq!(rows[0].root_count, 2);
        assert_eq!(rows[1].text, "");
        assert!(rows[1].english_roots.is_empty());
        assert_eq!(rows[1].root_count, 0);
        assert_eq!(rows[2].id.as_deref(), Some("v3"));
        assert_eq!(rows[2].english_roots, vec!["follow'la"]);
    }
}
