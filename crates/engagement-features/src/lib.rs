//! YouTube engagement metrics.
//!
//! Engagement Rate (%) = (likes + comments) / views * 100, with a zero/absent
//! view count giving `0.0` instead of a division error.

use frame_core::{Cell, Frame, FrameError};
use rayon::prelude::*;

pub mod qc;

pub use qc::{normalize_engagement_columns, qc_report, ColumnSummary, QcReport};

/// Columns [`engagement_rate_on_frame`] needs, in this order.
pub const REQUIRED_COLUMNS: [&str; 3] = ["likes", "comments", "views"];

/// Name of the column [`engagement_rate_on_frame`] appends.
pub const RATE_COLUMN: &str = "engagement_rate";

/// Engagement rate of one video, as a percentage. Unrounded.
///
/// Any `views` that is not strictly positive (zero, negative, NaN) yields
/// `0.0` whatever `likes` and `comments` are.
pub fn engagement_rate(likes: f64, comments: f64, views: f64) -> f64 {
    if !(views > 0.0) {
        return 0.0;
    }
    (likes + comments) / views * 100.0
}

/// Copy of `frame` with an `engagement_rate` column appended.
///
/// All of `likes`, `comments`, `views` must be present; otherwise nothing is
/// computed. A `views` cell that does not read as a number counts as `0`,
/// giving a `0.0` rate. A missing or unreadable `likes` or `comments` cell
/// leaves that row's rate null.
pub fn engagement_rate_on_frame(frame: &Frame) -> Result<Frame, FrameError> {
    let idx = frame.require_columns(&REQUIRED_COLUMNS)?;
    let (li, ci, vi) = (idx[0], idx[1], idx[2]);
    tracing::debug!(rows = frame.len(), "engagement rate batch");

    let rates: Vec<Cell> = frame
        .rows()
        .par_iter()
        .map(|row| {
            let (Some(likes), Some(comments)) = (row[li].as_f64(), row[ci].as_f64()) else {
                return Cell::Null;
            };
            let views = row[vi].as_f64().unwrap_or(0.0);
            Cell::Number(engagement_rate(likes, comments, views))
        })
        .collect();
    let missing = rates.iter().filter(|c| c.is_null()).count();
    if missing > 0 {
        tracing::debug!(missing, "rows without likes or comments get no rate");
    }
    frame.clone().with_column(RATE_COLUMN, rates)
}
