//! Column-typed tabular input for record batches.
//!
//! A [`Table`] is a list of named, equally long [`Column`]s. Each column
//! declares a [`ColumnKind`] that drives sanitization before upload.

pub mod cell;
pub mod sanitize;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

pub use cell::{Cell, ColumnKind};

use crate::error::{ApiError, ApiResult};
use crate::utils::constants::RECORD_ID_FIELD;

/// One row in API form: field name to JSON scalar.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<Cell>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

/// Row-oriented JSON form of a table, as read by the CLI.
///
/// ```json
/// {"columns": [{"name": "title", "kind": "text"}], "rows": [["hello"]]}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TableDocument {
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Table::push_column`].
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        kind: ColumnKind,
        values: Vec<Cell>,
    ) -> ApiResult<Self> {
        self.push_column(name, kind, values)?;
        Ok(self)
    }

    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        kind: ColumnKind,
        values: Vec<Cell>,
    ) -> ApiResult<()> {
        let name = name.into();
        if self.columns.iter().any(|c| c.name == name) {
            return Err(ApiError::validation(format!("duplicate column '{}'", name)));
        }
        if !self.columns.is_empty() && values.len() != self.len() {
            return Err(ApiError::validation(format!(
                "column '{}' has {} values, table has {} rows",
                name,
                values.len(),
                self.len()
            )));
        }
        self.columns.push(Column { name, kind, values });
        Ok(())
    }

    /// Single text column of record identifiers, the input of a batch delete.
    pub fn from_record_ids<S: AsRef<str>>(record_ids: &[S]) -> Self {
        Table {
            columns: vec![Column {
                name: RECORD_ID_FIELD.to_owned(),
                kind: ColumnKind::Text,
                values: record_ids.iter().map(|id| Cell::from(id.as_ref())).collect(),
            }],
        }
    }

    pub fn from_document(document: TableDocument) -> ApiResult<Self> {
        let width = document.columns.len();
        let mut values: Vec<Vec<Cell>> = vec![Vec::with_capacity(document.rows.len()); width];

        for (row_idx, row) in document.rows.iter().enumerate() {
            if row.len() != width {
                return Err(ApiError::validation(format!(
                    "row {} has {} values, expected {}",
                    row_idx,
                    row.len(),
                    width
                )));
            }
            for (col_idx, (spec, raw)) in document.columns.iter().zip(row).enumerate() {
                let cell = decode_cell(spec.kind, raw).map_err(|reason| {
                    ApiError::validation(format!("column '{}' row {}: {}", spec.name, row_idx, reason))
                })?;
                values[col_idx].push(cell);
            }
        }

        let mut table = Table::new();
        for (spec, cells) in document.columns.into_iter().zip(values) {
            table.push_column(spec.name, spec.kind, cells)?;
        }
        Ok(table)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn record(&self, row: usize) -> Option<Record> {
        if row >= self.len() {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|c| (c.name.to_owned(), c.values[row].to_json()))
                .collect(),
        )
    }

    /// All rows as API records, in row order.
    pub fn to_records(&self) -> Vec<Record> {
        (0..self.len()).filter_map(|row| self.record(row)).collect()
    }
}

fn decode_cell(kind: ColumnKind, raw: &Value) -> Result<Cell, String> {
    if raw.is_null() {
        return Ok(Cell::Missing);
    }
    match kind {
        ColumnKind::Integer => raw.as_i64().map(Cell::Int).ok_or_else(|| "expected integer".to_owned()),
        ColumnKind::Float => raw.as_f64().map(Cell::Float).ok_or_else(|| "expected number".to_owned()),
        ColumnKind::Boolean => raw.as_bool().map(Cell::Bool).ok_or_else(|| "expected boolean".to_owned()),
        ColumnKind::Text => Ok(match raw {
            Value::String(s) => Cell::Text(s.to_owned()),
            other => Cell::Text(other.to_string()),
        }),
        ColumnKind::DateTime => match raw {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| Cell::DateTime(dt.with_timezone(&Utc)))
                .map_err(|e| format!("invalid RFC 3339 datetime '{}': {}", s, e)),
            Value::Number(n) => n
                .as_i64()
                .and_then(DateTime::from_timestamp_millis)
                .map(Cell::DateTime)
                .ok_or_else(|| "expected epoch milliseconds".to_owned()),
            _ => Err("expected datetime".to_owned()),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn document_decodes_by_column_kind() {
        let document: TableDocument = serde_json::from_value(json!({
            "columns": [
                {"name": "title", "kind": "text"},
                {"name": "amount", "kind": "float"},
                {"name": "due", "kind": "datetime"}
            ],
            "rows": [
                ["first", 1.25, "2024-01-01T00:00:00Z"],
                [null, null, null]
            ]
        }))
        .unwrap();

        let table = Table::from_document(document).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("title").unwrap().values[1], Cell::Missing);
        assert_eq!(table.column("amount").unwrap().values[0], Cell::Float(1.25));
        assert_eq!(
            table.column("due").unwrap().values[0].to_json(),
            json!(1_704_067_200_000_i64)
        );
    }

    #[test]
    fn document_rejects_ragged_rows() {
        let document: TableDocument = serde_json::from_value(json!({
            "columns": [{"name": "a", "kind": "integer"}, {"name": "b", "kind": "integer"}],
            "rows": [[1]]
        }))
        .unwrap();
        assert!(Table::from_document(document).unwrap_err().is_validation());
    }

    #[test]
    fn document_rejects_wrong_value_type() {
        let document: TableDocument = serde_json::from_value(json!({
            "columns": [{"name": "n", "kind": "integer"}],
            "rows": [["not a number"]]
        }))
        .unwrap();
        let err = Table::from_document(document).unwrap_err();
        assert!(err.to_string().contains("column 'n' row 0"));
    }

    #[test]
    fn columns_must_have_equal_length() {
        let err = Table::new()
            .with_column("a", ColumnKind::Integer, vec![Cell::Int(1), Cell::Int(2)])
            .and_then(|t| t.with_column("b", ColumnKind::Integer, vec![Cell::Int(1)]))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn record_ids_table_has_single_text_column() {
        let table = Table::from_record_ids(&["rec1", "rec2"]);
        assert_eq!(table.column_names(), vec![RECORD_ID_FIELD]);
        assert_eq!(table.len(), 2);
    }
}
