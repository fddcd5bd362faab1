use serde_json::Value;

use super::{normalize_header, Row, TabularError};

/// Read CSV with a header row; every cell comes back as a JSON string
pub(super) fn read_rows(bytes: &[u8]) -> Result<Vec<Row>, TabularError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                // A malformed line only costs that line
                tracing::debug!("Skipping unreadable CSV record: {}", e);
                continue;
            }
        };

        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), Value::String(cell.to_string())))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}
