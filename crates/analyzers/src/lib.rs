use std::fmt;

use engagement_features::{engagement_rate, engagement_rate_on_frame, qc_report};
use frame_core::{Cell, Frame, FrameError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use text_features::{
    cmr_batch, code_mixing_ratio, distinct_root_count, Lexicon, RootExtractor, TextRecord,
};
use thiserror::Error;

pub mod eda;

pub use eda::{eda_summary, EdaSummary};

const DEFAULT_TEXT_COLUMN: &str = "text";

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct AnalyzeOpts {
    /// English word list for the CMR lexicon filter.
    pub lexicon: Option<Vec<String>>,
    /// Roots only; defaults to true.
    pub use_stemming: Option<bool>,
    /// Input text column; defaults to "text".
    pub text_column: Option<String>,
    /// CMR output text column; defaults to "text".
    pub output_text_column: Option<String>,
    /// Carried through to result rows.
    pub id_column: Option<String>,
}

impl AnalyzeOpts {
    fn text_column(&self) -> &str {
        self.text_column.as_deref().unwrap_or(DEFAULT_TEXT_COLUMN)
    }

    fn lexicon(&self) -> Option<Lexicon> {
        self.lexicon.as_ref().map(|words| words.iter().collect())
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    Cmr,
    Roots,
    Engagement,
    Eda,
    Qc,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Task::Cmr => "cmr",
            Task::Roots => "roots",
            Task::Engagement => "engagement",
            Task::Eda => "eda",
            Task::Qc => "qc",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub enum InputPayload {
    Text { text: String },
    Frame { frame: Frame },
    Counts { likes: f64, comments: f64, views: f64 },
}

impl InputPayload {
    fn kind(&self) -> &'static str {
        match self {
            InputPayload::Text { .. } => "text",
            InputPayload::Frame { .. } => "table",
            InputPayload::Counts { .. } => "counts",
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum OutputArtifact {
    Json { data: serde_json::Value },
    Csv { data: String },
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct AnalyzeRequest {
    pub task: Task,
    pub options: AnalyzeOpts,
    pub payload: InputPayload,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct AnalyzeResponse {
    pub artifacts: Vec<OutputArtifact>,
}

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error("task `{task}` does not accept {payload} input")]
    UnsupportedPayload { task: Task, payload: &'static str },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Pull text records out of a table. The text column (and the id column when
/// one is configured) must exist; missing cells stay `None`.
pub fn records_from_frame(
    frame: &Frame,
    text_column: &str,
    id_column: Option<&str>,
) -> Result<Vec<TextRecord>, FrameError> {
    let mut required = vec![text_column];
    required.extend(id_column);
    let idx = frame.require_columns(&required)?;
    let (ti, ii) = (idx[0], idx.get(1).copied());
    Ok(frame
        .rows()
        .iter()
        .map(|row| TextRecord {
            id: ii.and_then(|i| row[i].as_text()).map(|s| s.into_owned()),
            text: row[ti].as_text().map(|s| s.into_owned()),
        })
        .collect())
}

fn table_artifacts(frame: &Frame) -> Result<Vec<OutputArtifact>, AnalyzeError> {
    Ok(vec![
        OutputArtifact::Csv { data: frame.to_csv_string()? },
        OutputArtifact::Json { data: frame.to_json_records() },
    ])
}

fn cmr_table(records: &[TextRecord], opts: &AnalyzeOpts) -> Result<Frame, FrameError> {
    let lexicon = opts.lexicon();
    let rows = cmr_batch(records, lexicon.as_ref());

    let mut columns: Vec<&str> = opts.id_column.iter().map(String::as_str).collect();
    columns.push(opts.output_text_column.as_deref().unwrap_or(DEFAULT_TEXT_COLUMN));
    columns.extend(["token_count", "english_token_count", "cmr"]);

    let has_id = opts.id_column.is_some();
    let rows = rows
        .into_iter()
        .map(|r| {
            let mut cells = Vec::with_capacity(5);
            if has_id {
                cells.push(Cell::from(r.id));
            }
            cells.extend([
                Cell::from(r.text),
                Cell::from(r.token_count),
                Cell::from(r.english_token_count),
                Cell::from(r.cmr),
            ]);
            cells
        })
        .collect();
    Frame::from_rows(columns, rows)
}

fn roots_table(records: &[TextRecord], opts: &AnalyzeOpts) -> Result<Frame, AnalyzeError> {
    let extractor = RootExtractor::with_default_stemmer();
    let rows = extractor.roots_batch(records, opts.use_stemming.unwrap_or(true));

    let mut columns: Vec<&str> = opts.id_column.iter().map(String::as_str).collect();
    columns.extend(["text", "english_roots", "root_count"]);

    let has_id = opts.id_column.is_some();
    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
        let mut cells = Vec::with_capacity(4);
        if has_id {
            cells.push(Cell::from(r.id));
        }
        cells.push(Cell::from(r.text));
        cells.push(Cell::from(serde_json::to_string(&r.english_roots)?));
        cells.push(Cell::from(r.root_count));
        out.push(cells);
    }
    Ok(Frame::from_rows(columns, out)?)
}

/// Route a request to its analysis and collect the artifacts.
pub fn handle_analyze(req: AnalyzeRequest) -> Result<AnalyzeResponse, AnalyzeError> {
    let opts = &req.options;
    tracing::info!(task = %req.task, input = req.payload.kind(), "analyze");

    let artifacts = match (req.task, req.payload) {
        (Task::Cmr, InputPayload::Text { text }) => {
            let lexicon = opts.lexicon();
            let r = code_mixing_ratio(&text, lexicon.as_ref());
            vec![OutputArtifact::Json { data: json!({
                "text": text,
                "token_count": r.token_count,
                "english_token_count": r.english_token_count,
                "cmr": r.cmr,
            })}]
        }
        (Task::Cmr, InputPayload::Frame { frame }) => {
            let records =
                records_from_frame(&frame, opts.text_column(), opts.id_column.as_deref())?;
            table_artifacts(&cmr_table(&records, opts)?)?
        }
        (Task::Roots, InputPayload::Text { text }) => {
            let roots = RootExtractor::with_default_stemmer()
                .extract_roots(&text, opts.use_stemming.unwrap_or(true));
            vec![OutputArtifact::Json { data: json!({
                "text": text,
                "root_count": distinct_root_count(&roots),
                "english_roots": roots,
            })}]
        }
        (Task::Roots, InputPayload::Frame { frame }) => {
            let records =
                records_from_frame(&frame, opts.text_column(), opts.id_column.as_deref())?;
            table_artifacts(&roots_table(&records, opts)?)?
        }
        (Task::Engagement, InputPayload::Counts { likes, comments, views }) => {
            vec![OutputArtifact::Json { data: json!({
                "likes": likes,
                "comments": comments,
                "views": views,
                "engagement_rate": engagement_rate(likes, comments, views),
            })}]
        }
        (Task::Engagement, InputPayload::Frame { frame }) => {
            table_artifacts(&engagement_rate_on_frame(&frame)?)?
        }
        (Task::Eda, InputPayload::Frame { frame }) => {
            let summary = eda_summary(&frame, opts.text_column())?;
            vec![
                OutputArtifact::Json { data: serde_json::to_value(&summary)? },
                OutputArtifact::Csv { data: summary.to_frame()?.to_csv_string()? },
            ]
        }
        (Task::Qc, InputPayload::Frame { frame }) => {
            vec![OutputArtifact::Json { data: serde_json::to_value(qc_report(&frame))? }]
        }
        (task, payload) => {
            return Err(AnalyzeError::UnsupportedPayload { task, payload: payload.kind() });
        }
    };
    Ok(AnalyzeResponse { artifacts })
}
