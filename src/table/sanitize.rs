use crate::table::cell::{Cell, ColumnKind};
use crate::table::{Column, Table};
use crate::helpers::time::to_epoch_millis;

impl Table {
    /// Replace values the API cannot take as-is.
    ///
    /// Numeric columns get `null` for missing values, text columns an empty
    /// string, datetime columns epoch milliseconds (or `null`). Row count and
    /// column set never change.
    pub fn sanitize(&self) -> Table {
        Table {
            columns: self.columns.iter().map(sanitize_column).collect(),
        }
    }
}

fn sanitize_column(column: &Column) -> Column {
    Column {
        name: column.name.to_owned(),
        kind: column.kind,
        values: column
            .values
            .iter()
            .map(|cell| sanitize_cell(column.kind, cell))
            .collect(),
    }
}

fn sanitize_cell(kind: ColumnKind, cell: &Cell) -> Cell {
    if cell.is_missing() {
        return match kind {
            ColumnKind::Text => Cell::Text(String::new()),
            _ => Cell::Null,
        };
    }
    match (kind, cell) {
        (ColumnKind::DateTime, Cell::DateTime(dt)) => Cell::Int(to_epoch_millis(dt)),
        _ => cell.clone(),
    }
}
