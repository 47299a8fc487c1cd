//! Quality-control summary of an engagement table: descriptive statistics,
//! average/max engagement rates and Spearman correlations.

use frame_core::{describe, spearman_matrix, stats, CorrelationMatrix, Describe, Frame};
use serde::{Deserialize, Serialize};

pub const ER_VIEW: &str = "ER_View_%";
pub const ER_SUBSCRIBER: &str = "ER_Subscriber_%";

/// Numeric columns the report looks at, in reporting order.
pub const NUMERIC_COLUMNS: [&str; 6] =
    ["views", "likes", "comments", "subscribers", ER_VIEW, ER_SUBSCRIBER];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    pub stats: Describe,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QcReport {
    pub video_count: usize,
    pub numeric_columns: Vec<String>,
    pub describe: Vec<ColumnSummary>,
    pub avg_er_view: Option<f64>,
    pub avg_er_subscriber: Option<f64>,
    pub max_er_view: Option<f64>,
    pub max_er_subscriber: Option<f64>,
    /// Present once at least three numeric columns exist.
    pub spearman: Option<CorrelationMatrix>,
}

/// Trim and lowercase column names, restoring the canonical casing of the
/// rate columns (`er_view_%` → `ER_View_%`).
pub fn normalize_engagement_columns(frame: &mut Frame) {
    frame.rename_columns(|c| {
        let lower = c.trim().to_lowercase();
        match lower.as_str() {
            "er_view_%" => ER_VIEW.to_string(),
            "er_subscriber_%" => ER_SUBSCRIBER.to_string(),
            _ => lower,
        }
    });
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Build the QC report. Column names are normalized first; cells that do
/// not parse as numbers are treated as missing. Statistics are rounded to two
/// decimals, correlations are not.
pub fn qc_report(frame: &Frame) -> QcReport {
    let mut frame = frame.clone();
    normalize_engagement_columns(&mut frame);

    let series: Vec<(String, Vec<Option<f64>>)> = NUMERIC_COLUMNS
        .iter()
        .filter_map(|name| Some((name.to_string(), frame.numeric_column(name)?)))
        .collect();
    tracing::debug!(rows = frame.len(), numeric = series.len(), "qc report");

    let summaries = series
        .iter()
        .map(|(name, values)| {
            let present: Vec<f64> = values.iter().flatten().copied().collect();
            ColumnSummary { column: name.clone(), stats: describe(&present).map(round2) }
        })
        .collect();

    let column = |name: &str| series.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_slice());
    let er_view = column(ER_VIEW);
    let er_subscriber = column(ER_SUBSCRIBER);

    QcReport {
        video_count: frame.len(),
        numeric_columns: series.iter().map(|(n, _)| n.clone()).collect(),
        describe: summaries,
        avg_er_view: er_view.and_then(stats::mean).map(round2),
        avg_er_subscriber: er_subscriber.and_then(stats::mean).map(round2),
        max_er_view: er_view.and_then(stats::max).map(round2),
        max_er_subscriber: er_subscriber.and_then(stats::max).map(round2),
        spearman: (series.len() >= 3).then(|| spearman_matrix(&series)),
    }
}
