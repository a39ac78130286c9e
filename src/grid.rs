//! The raw sheet grid handed to the extraction core.
//!
//! A [`Grid`] is loaded once, with no header interpretation, and is only ever
//! read afterwards. Rows may be ragged; positions past the end of a row read as
//! [`Cell::Empty`].

use std::{fs, io::Read, path::Path};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{cell::Cell, io_utils};

static EMPTY: Cell = Cell::Empty;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Convenience constructor for text rows, each field read with
    /// [`Cell::from_field`].
    pub fn from_text_rows<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|field| Cell::from_field(field.as_ref()))
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&EMPTY)
    }

    /// Widest row in the grid.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Trimmed text of the first cell of `row`, empty when absent.
    pub fn first_text(&self, row: usize) -> String {
        self.cell(row, 0).text().trim().to_string()
    }

    pub fn row_is_blank(&self, row: usize) -> bool {
        self.row(row)
            .is_none_or(|cells| cells.iter().all(Cell::is_blank))
    }
}

/// Loads a grid from a JSON array of rows or from delimited text.
///
/// Files ending in `.json` are parsed as `[[number|string|null, ...], ...]`;
/// everything else (including `-` for stdin) is read as delimited text without
/// a header row.
pub fn load_grid(
    path: &Path,
    delimiter: Option<u8>,
    encoding: &'static Encoding,
) -> Result<Grid> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let grid = if is_json {
        let raw = fs::read(path).with_context(|| format!("Reading grid file {path:?}"))?;
        let text = io_utils::decode_bytes(&raw, encoding)?;
        serde_json::from_str::<Grid>(&text)
            .with_context(|| format!("Parsing JSON grid {path:?}"))?
    } else {
        let delimiter = io_utils::resolve_input_delimiter(path, delimiter);
        let reader = io_utils::open_grid_reader_from_path(path, delimiter)?;
        read_delimited_grid(reader, encoding)
            .with_context(|| format!("Reading delimited grid {path:?}"))?
    };
    debug!(
        "Loaded grid {:?} with {} row(s), {} column(s)",
        path,
        grid.len(),
        grid.width()
    );
    Ok(grid)
}

pub fn read_delimited_grid<R: Read>(
    mut reader: csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Grid> {
    let mut rows = Vec::new();
    let mut record = csv::ByteRecord::new();
    while reader
        .read_byte_record(&mut record)
        .with_context(|| format!("Reading row {}", rows.len()))?
    {
        let decoded = io_utils::decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {}", rows.len()))?;
        rows.push(decoded.iter().map(|field| Cell::from_field(field)).collect());
    }
    Ok(Grid::new(rows))
}
