//! Code-mixing measurements for Turkish/English social-media text.
//!
//! The pipeline is: tokenize ([`Tokenizer`]) → classify ([`is_english_token`])
//! → aggregate ([`code_mixing_ratio`]). A second, looser tokenizer feeds the
//! [`RootExtractor`], which can optionally stem through an injected [`Stemmer`].
//!
//! Everything here is a pure function of its inputs; file formats and
//! tabular plumbing live in other crates.

pub mod classify;
pub mod lexicon;
pub mod ratio;
pub mod roots;
pub mod stem;
pub mod tokenize;

pub use classify::is_english_token;
pub use lexicon::Lexicon;
pub use ratio::{cmr_batch, code_mixing_ratio, code_mixing_ratio_with, CmrRow, RatioResult};
pub use roots::{distinct_root_count, extract_english_roots, RootExtractor, RootRow};
pub use stem::{Stemmer, Unstemmed};
#[cfg(feature = "stemming")]
pub use stem::SnowballStemmer;
pub use tokenize::{CharClass, Tokenizer};

use serde::{Deserialize, Serialize};

/// One input unit of a batch run: a text that may be missing, plus an
/// optional identifier (e.g. a video id) carried through to the result row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl TextRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self { id: None, text: Some(text.into()) }
    }

    pub fn with_id(id: impl Into<String>, text: Option<String>) -> Self {
        Self { id: Some(id.into()), text }
    }

    /// Missing text is read as the empty string.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}
