use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use serde_json::{Map, Value};

use crate::{Cell, Frame, FrameError};

/// Load a `.csv` or `.json` (array of objects) file by extension.
pub fn load_frame(path: &Path) -> Result<Frame, FrameError> {
    let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    let frame = match ext.as_deref() {
        Some("csv") => Frame::from_csv_reader(File::open(path)?)?,
        Some("json") => Frame::from_json_reader(BufReader::new(File::open(path)?))?,
        _ => return Err(FrameError::UnsupportedFormat(path.display().to_string())),
    };
    tracing::debug!(
        path = %path.display(),
        rows = frame.len(),
        columns = frame.columns().len(),
        "loaded frame"
    );
    Ok(frame)
}

fn json_cell(v: Value) -> Cell {
    match v {
        Value::Null => Cell::Null,
        Value::Number(n) => n.as_f64().map_or(Cell::Null, Cell::Number),
        Value::String(s) => Cell::Text(s),
        Value::Bool(b) => Cell::Text(b.to_string()),
        other => Cell::Text(other.to_string()),
    }
}

fn cell_json(c: &Cell) -> Value {
    match c {
        Cell::Null => Value::Null,
        Cell::Number(n) => serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number),
        Cell::Text(s) => Value::String(s.clone()),
    }
}

impl Frame {
    /// Read a headed CSV. Blank fields become [`Cell::Null`].
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, FrameError> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let mut frame = Frame::new(rdr.headers()?.iter());
        for record in rdr.records() {
            let record = record?;
            frame.push_row(record.iter().map(Cell::from_raw).collect())?;
        }
        Ok(frame)
    }

    /// Read a JSON array of objects. Columns appear in first-seen order and
    /// keys absent from a record become nulls.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, FrameError> {
        let Value::Array(items) = serde_json::from_reader(reader)? else {
            return Err(FrameError::NotRecords);
        };
        let mut records: Vec<Map<String, Value>> = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::Object(map) => records.push(map),
                _ => return Err(FrameError::NotRecords),
            }
        }

        let mut columns: Vec<String> = Vec::new();
        for rec in &records {
            for key in rec.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let mut frame = Frame::new(columns.clone());
        for mut rec in records {
            let row = columns.iter().map(|c| rec.remove(c).map_or(Cell::Null, json_cell)).collect();
            frame.push_row(row)?;
        }
        Ok(frame)
    }

    pub fn to_csv_string(&self) -> Result<String, FrameError> {
        let mut w = csv::Writer::from_writer(Vec::new());
        w.write_record(&self.columns)?;
        for row in &self.rows {
            w.write_record(row.iter().map(|c| c.to_string()))?;
        }
        let bytes = w.into_inner().map_err(|e| FrameError::Io(e.into_error()))?;
        String::from_utf8(bytes)
            .map_err(|e| FrameError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    /// Rows as an array of JSON objects, keyed by column name.
    pub fn to_json_records(&self) -> Value {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let obj: Map<String, Value> =
                    self.columns.iter().cloned().zip(row.iter().map(cell_json)).collect();
                Value::Object(obj)
            })
            .collect();
        Value::Array(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_roundtrips_through_cells() {
        let data = "video_id,likes,comments,views\nvid001,120,45,2000\nvid002,,\"1,5\",5000\n";
        let f = Frame::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(f.columns(), ["video_id", "likes", "comments", "views"]);
        assert_eq!(f.len(), 2);
        assert_eq!(f.rows()[0][1], Cell::Number(120.0));
        assert_eq!(f.rows()[1][1], Cell::Null);
        assert_eq!(f.rows()[1][2], Cell::Text("1,5".into()));

        let out = f.to_csv_string().unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn ragged_csv_is_an_error() {
        let data = "a,b\n1,2\n3\n";
        assert!(Frame::from_csv_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn json_records_union_their_keys() {
        let data = r#"[{"text": "very good", "id": 1}, {"id": 2, "extra": true}]"#;
        let f = Frame::from_json_reader(data.as_bytes()).unwrap();
        assert_eq!(f.columns(), ["text", "id", "extra"]);
        assert_eq!(
            f.rows()[0],
            vec![Cell::Text("very good".into()), Cell::Number(1.0), Cell::Null]
        );
        assert_eq!(f.rows()[1], vec![Cell::Null, Cell::Number(2.0), Cell::Text("true".into())]);
    }

    #[test]
    fn json_must_be_records() {
        assert!(matches!(Frame::from_json_reader(&b"{\"a\": 1}"[..]), Err(FrameError::NotRecords)));
        assert!(matches!(Frame::from_json_reader(&b"[1, 2]"[..]), Err(FrameError::NotRecords)));
    }

    #[test]
    fn json_records_output_keeps_column_order() {
        let f = Frame::from_rows(["b", "a"], vec![vec![Cell::Number(1.0), Cell::Null]]).unwrap();
        assert_eq!(f.to_json_records().to_string(), r#"[{"b":1.0,"a":null}]"#);
    }

    #[test]
    fn unknown_extension_is_rejected_before_reading() {
        let err = load_frame(Path::new("does-not-exist.xlsx")).unwrap_err();
        assert!(matches!(err, FrameError::UnsupportedFormat(_)));
        assert!(err.to_string().contains("does-not-exist.xlsx"));
    }
}
