use frame_core::{describe, Cell, Describe, Frame, FrameError};
use serde::{Deserialize, Serialize};
use text_features::Tokenizer;

/// Length statistics of a text column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdaSummary {
    pub text_column: String,
    /// Rows in the input, including those with missing text.
    pub rows: usize,
    /// Rows dropped because the text cell was missing.
    pub missing: usize,
    pub token_count: Describe,
    pub char_count: Describe,
}

impl EdaSummary {
    /// The summary as a `stat, token_count, char_count` table.
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let tokens = self.token_count.values();
        let chars = self.char_count.values();
        let rows = Describe::STAT_NAMES
            .iter()
            .zip(tokens.into_iter().zip(chars))
            .map(|(stat, (t, c))| vec![Cell::from(*stat), Cell::from(t), Cell::from(c)])
            .collect();
        Frame::from_rows(["stat", "token_count", "char_count"], rows)
    }
}

/// Token and character counts per non-missing text, described.
pub fn eda_summary(frame: &Frame, text_column: &str) -> Result<EdaSummary, FrameError> {
    frame.require_columns(&[text_column])?;
    let tokenizer = Tokenizer::ratio();

    let mut tokens = Vec::with_capacity(frame.len());
    let mut chars = Vec::with_capacity(frame.len());
    let mut missing = 0;
    for cell in frame.column(text_column).into_iter().flatten() {
        let Some(text) = cell.as_text() else {
            missing += 1;
            continue;
        };
        tokens.push(tokenizer.tokenize(&text).len() as f64);
        chars.push(text.chars().count() as f64);
    }
    tracing::debug!(rows = frame.len(), missing, "eda summary");

    Ok(EdaSummary {
        text_column: text_column.to_owned(),
        rows: frame.len(),
        missing,
        token_count: describe(&tokens),
        char_count: describe(&chars),
    })
}
