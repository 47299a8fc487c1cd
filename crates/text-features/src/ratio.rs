use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{is_english_token, Lexicon, TextRecord, Tokenizer};

/// Token counts and code-mixing ratio for one text.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatioResult {
    pub token_count: usize,
    pub english_token_count: usize,
    /// `english_token_count / token_count`, or `0.0` when there are no tokens.
    pub cmr: f64,
}

impl RatioResult {
    pub const EMPTY: RatioResult = RatioResult { token_count: 0, english_token_count: 0, cmr: 0.0 };

    fn from_tokens(tokens: &[&str], lexicon: Option<&Lexicon>) -> Self {
        if tokens.is_empty() {
            return Self::EMPTY;
        }
        let english = tokens.iter().filter(|t| is_english_token(t, lexicon)).count();
        Self {
            token_count: tokens.len(),
            english_token_count: english,
            cmr: english as f64 / tokens.len() as f64,
        }
    }
}

/// Code-mixing ratio with the standard ratio tokenizer.
pub fn code_mixing_ratio(text: &str, lexicon: Option<&Lexicon>) -> RatioResult {
    code_mixing_ratio_with(&Tokenizer::ratio(), text, lexicon)
}

/// Code-mixing ratio with an explicitly chosen tokenizer.
pub fn code_mixing_ratio_with(
    tokenizer: &Tokenizer,
    text: &str,
    lexicon: Option<&Lexicon>,
) -> RatioResult {
    RatioResult::from_tokens(&tokenizer.tokenize(text), lexicon)
}

/// One output row of [`cmr_batch`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CmrRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    pub token_count: usize,
    pub english_token_count: usize,
    pub cmr: f64,
}

/// Apply [`code_mixing_ratio`] to every record, one row per record, in
/// input order. Missing text is measured as `""`.
pub fn cmr_batch(records: &[TextRecord], lexicon: Option<&Lexicon>) -> Vec<CmrRow> {
    tracing::debug!(records = records.len(), lexicon = lexicon.map(Lexicon::len), "cmr batch");
    records
        .par_iter()
        .map(|rec| {
            let text = rec.text_or_empty();
            let r = code_mixing_ratio(text, lexicon);
            CmrRow {
                id: rec.id.clone(),
                text: text.to_owned(),
                token_count: r.token_count,
                english_token_count: r.english_token_count,
                cmr: r.cmr,
            }
        })
        .collect()
}
