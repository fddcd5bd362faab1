use serde_json::Value;

use crate::modules::tabular::Row;

/// Header names accepted for the owning user
const USER_COLUMNS: [&str; 2] = ["user_id", "utilisateur_id"];

/// Header names accepted for the geometry payload
const GEOMETRY_COLUMNS: [&str; 3] = ["geometry", "geojson", "geometrie"];

/// A bulk-import row that parsed cleanly
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneImportRow {
    pub user_id: i64,
    pub geometry: Value,
}

/// Parse one tabular row, or `None` when it should be skipped.
///
/// The user id may be a number or a numeric string. The geometry may be a
/// JSON object/array already, or text holding one.
pub fn parse_import_row(row: &Row) -> Option<ZoneImportRow> {
    let user_id = first_present(row, &USER_COLUMNS).and_then(parse_user_id)?;
    let geometry = first_present(row, &GEOMETRY_COLUMNS).and_then(parse_geometry)?;

    Some(ZoneImportRow { user_id, geometry })
}

fn first_present<'a>(row: &'a Row, columns: &[&str]) -> Option<&'a Value> {
    columns
        .iter()
        .filter_map(|column| row.get(*column))
        .find(|value| !value.is_null())
}

fn parse_user_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn parse_geometry(value: &Value) -> Option<Value> {
    match value {
        Value::Object(_) | Value::Array(_) => Some(value.clone()),
        Value::String(s) => match serde_json::from_str::<Value>(s.trim()) {
            Ok(parsed @ (Value::Object(_) | Value::Array(_))) => Some(parsed),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("row must be an object"),
        }
    }

    #[test]
    fn test_textual_geometry_and_numeric_string_id() {
        let parsed = parse_import_row(&row(json!({
            "user_id": " 7 ",
            "geometry": "{\"type\":\"Polygon\",\"coordinates\":[]}"
        })))
        .unwrap();

        assert_eq!(parsed.user_id, 7);
        assert_eq!(parsed.geometry["type"], "Polygon");
    }

    #[test]
    fn test_structured_geometry_and_numeric_id() {
        let parsed = parse_import_row(&row(json!({
            "user_id": 3,
            "geometry": {"type": "Polygon", "coordinates": [[[9.4, 0.4]]]}
        })))
        .unwrap();

        assert_eq!(parsed.user_id, 3);
        assert_eq!(parsed.geometry["coordinates"][0][0][0], 9.4);
    }

    #[test]
    fn test_alternate_column_names() {
        let parsed = parse_import_row(&row(json!({
            "utilisateur_id": "12",
            "geometrie": "[[1, 2], [3, 4]]"
        })))
        .unwrap();
        assert_eq!(parsed.user_id, 12);
        assert!(parsed.geometry.is_array());

        let parsed = parse_import_row(&row(json!({
            "user_id": 5.0,
            "geojson": {"type": "Point"}
        })))
        .unwrap();
        assert_eq!(parsed.user_id, 5);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let cases = [
            json!({"user_id": "abc", "geometry": "{}"}),
            json!({"user_id": 1.5, "geometry": "{}"}),
            json!({"geometry": "{}"}),
            json!({"user_id": 1}),
            json!({"user_id": 1, "geometry": "not json"}),
            json!({"user_id": 1, "geometry": "42"}),
            json!({"user_id": 1, "geometry": null}),
        ];

        for case in cases {
            assert!(parse_import_row(&row(case.clone())).is_none(), "{}", case);
        }
    }
}
