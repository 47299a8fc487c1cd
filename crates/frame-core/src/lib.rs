//! A small column-named table used at the batch boundary.
//!
//! Cells are loosely typed ([`Cell`]): loaders keep a value as a number only
//! when it prints back exactly as read, everything else stays text, and
//! consumers coerce per column.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod io;
pub mod stats;

pub use io::load_frame;
pub use stats::{describe, spearman, spearman_matrix, CorrelationMatrix, Describe};

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("unsupported file format: {0} (use .csv or .json)")]
    UnsupportedFormat(String),
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth { row: usize, expected: usize, found: usize },
    #[error("JSON input must be an array of objects")]
    NotRecords,
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A single table value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Interpret a raw CSV field: blank and NA markers are null, finite
    /// numbers that display identically to `raw` are numbers, the rest is
    /// text. `007`, `1.50` or ` 12` therefore stay text and keep their
    /// spelling; [`Cell::as_f64`] still reads them as numbers.
    pub fn from_raw(raw: &str) -> Cell {
        let t = raw.trim();
        if t.is_empty() || matches!(t, "NA" | "N/A" | "NaN" | "nan" | "null" | "NULL") {
            return Cell::Null;
        }
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() && n.to_string() == raw => Cell::Number(n),
            _ => Cell::Text(raw.to_owned()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Numeric view of the cell. Text is cleaned the way spreadsheet exports
    /// need it (decimal comma to dot, spaces removed) before parsing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Null => None,
            Cell::Number(n) => n.is_finite().then_some(*n),
            Cell::Text(s) => {
                let cleaned: String = s
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| if c == ',' { '.' } else { c })
                    .collect();
                cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
    }

    /// Text view of the cell; `None` for null.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Null => None,
            Cell::Number(n) => Some(Cow::Owned(n.to_string())),
            Cell::Text(s) => Some(Cow::Borrowed(s)),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<usize> for Cell {
    fn from(n: usize) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_owned())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map_or(Cell::Null, Into::into)
    }
}

/// Rows of cells under named columns. Every row has one cell per column.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Frame {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self { columns: columns.into_iter().map(Into::into).collect(), rows: Vec::new() }
    }

    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<Cell>>,
    ) -> Result<Self, FrameError> {
        let mut frame = Self::new(columns);
        for row in rows {
            frame.push_row(row)?;
        }
        Ok(frame)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), FrameError> {
        if row.len() != self.columns.len() {
            return Err(FrameError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Indices of `names`, or every missing name at once.
    pub fn require_columns(&self, names: &[&str]) -> Result<Vec<usize>, FrameError> {
        let missing: Vec<String> =
            names.iter().filter(|n| !self.has_column(n)).map(|n| n.to_string()).collect();
        if !missing.is_empty() {
            return Err(FrameError::MissingColumns(missing));
        }
        Ok(names.iter().filter_map(|n| self.column_index(n)).collect())
    }

    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[idx]))
    }

    /// Numeric view of a column, unparseable cells as `None`.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        Some(self.column(name)?.map(Cell::as_f64).collect())
    }

    /// Append a column, or overwrite it if the name already exists.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        cells: Vec<Cell>,
    ) -> Result<Self, FrameError> {
        if cells.len() != self.rows.len() {
            return Err(FrameError::RowWidth {
                row: self.rows.len(),
                expected: self.rows.len(),
                found: cells.len(),
            });
        }
        let name = name.into();
        match self.column_index(&name) {
            Some(idx) => {
                for (row, cell) in self.rows.iter_mut().zip(cells) {
                    row[idx] = cell;
                }
            }
            None => {
                self.columns.push(name);
                for (row, cell) in self.rows.iter_mut().zip(cells) {
                    row.push(cell);
                }
            }
        }
        Ok(self)
    }

    pub fn rename_columns(&mut self, mut f: impl FnMut(&str) -> String) {
        for c in &mut self.columns {
            *c = f(c);
        }
    }
}
