//! Slicing the grid into a typed [`Table`].

use log::debug;
use serde::Serialize;

use crate::{
    cell::{Cell, CoercionPolicy, coerce},
    error::GridError,
    grid::Grid,
    schema::Schema,
};

/// A materialized table. Every row holds exactly one cell per schema column;
/// column 0 is text, every other column numeric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub schema: Schema,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn columns(&self) -> Vec<String> {
        self.schema.column_names()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Looks up a cell by row label (identifier column) and canonical column name.
    pub fn value(&self, label: &str, column: &str) -> Option<&Cell> {
        let column_index = self.schema.column_index(column)?;
        self.rows
            .iter()
            .find(|row| matches!(row.first(), Some(Cell::Text(text)) if text == label))
            .and_then(|row| row.get(column_index))
    }

    /// Rows paired with their column names, in schema order.
    pub fn records(&self) -> Vec<Vec<(&str, &Cell)>> {
        self.rows
            .iter()
            .map(|row| {
                self.schema
                    .columns
                    .iter()
                    .map(|column| column.canonical_name.as_str())
                    .zip(row.iter())
                    .collect()
            })
            .collect()
    }
}

pub fn column_policy(index: usize) -> CoercionPolicy {
    if index == 0 {
        CoercionPolicy::AsIdentifier
    } else {
        CoercionPolicy::AsNumeric
    }
}

/// Builds a table from rows `data_start..data_end` of `grid`.
///
/// Grid column `i` feeds schema column `i`. Rows that are blank across the
/// whole grid row are dropped.
pub fn materialize(
    grid: &Grid,
    header_row: usize,
    data_start: usize,
    data_end: usize,
    schema: &Schema,
) -> Result<Table, GridError> {
    if data_end > grid.len() {
        return Err(GridError::RowOutOfRange {
            row: data_end,
            len: grid.len(),
        });
    }
    if data_start > data_end {
        return Err(GridError::InvertedRange {
            start: data_start,
            end: data_end,
        });
    }
    if header_row >= data_start {
        return Err(GridError::HeaderAfterData {
            header: header_row,
            data_start,
        });
    }

    let mut rows = Vec::with_capacity(data_end - data_start);
    let mut dropped = 0usize;
    for row_index in data_start..data_end {
        if grid.row_is_blank(row_index) {
            dropped += 1;
            continue;
        }
        let row = (0..schema.len())
            .map(|column| coerce(grid.cell(row_index, column), column_policy(column)))
            .collect();
        rows.push(row);
    }
    debug!(
        "Materialized {} row(s) from {}..{} ({} blank row(s) dropped)",
        rows.len(),
        data_start,
        data_end,
        dropped
    );
    Ok(Table {
        schema: schema.clone(),
        rows,
    })
}
