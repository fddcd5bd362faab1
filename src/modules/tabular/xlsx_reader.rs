use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use serde_json::{Number, Value};

use super::{normalize_header, Row, TabularError};

/// Read the first worksheet; the first row is the header
pub(super) fn read_rows(bytes: &[u8]) -> Result<Vec<Row>, TabularError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| TabularError::Spreadsheet(format!("Failed to open workbook: {}", e)))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => range,
        Some(Err(e)) => {
            return Err(TabularError::Spreadsheet(format!(
                "Failed to read first sheet: {}",
                e
            )))
        }
        None => return Ok(Vec::new()),
    };

    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| normalize_header(&cell_to_string(cell)))
            .collect(),
        None => return Ok(Vec::new()),
    };

    let rows = rows_iter
        .map(|cells| {
            headers
                .iter()
                .zip(cells.iter())
                .filter(|(header, _)| !header.is_empty())
                .map(|(header, cell)| (header.clone(), cell_to_value(cell)))
                .collect::<Row>()
        })
        .collect();

    Ok(rows)
}

/// Integral floats become integers so `7.0` in a sheet reads as user 7
fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Int(i) => Value::Number((*i).into()),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                Value::Number((*f as i64).into())
            } else {
                Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null)
            }
        }
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => Value::String(format!("{dt}")),
        Data::Error(e) => {
            tracing::debug!("Spreadsheet cell error: {:?}", e);
            Value::Null
        }
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell_to_value(cell) {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
