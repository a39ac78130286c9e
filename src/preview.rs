use anyhow::Result;
use log::info;

use crate::{cli::PreviewArgs, grid, io_utils, table};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.grid.input_encoding.as_deref())?;
    let grid = grid::load_grid(&args.grid.input, args.grid.delimiter, encoding)?;
    let (headers, rows) = preview_rows(&grid, args.rows);
    table::print_table(&headers, &rows);
    info!(
        "Displayed {} of {} row(s) from {:?}",
        rows.len(),
        grid.len(),
        args.grid.input
    );
    Ok(())
}

/// Raw rows prefixed with their zero-based grid index, padded to the widest
/// displayed row.
pub fn preview_rows(grid: &grid::Grid, limit: usize) -> (Vec<String>, Vec<Vec<String>>) {
    let shown = grid.rows().take(limit).collect::<Vec<_>>();
    let width = shown.iter().map(|row| row.len()).max().unwrap_or(0);
    let mut headers = vec!["row".to_string()];
    headers.extend((0..width).map(|column| format!("c{column}")));
    let rows = shown
        .iter()
        .enumerate()
        .map(|(index, cells)| {
            let mut line = vec![index.to_string()];
            line.extend((0..width).map(|column| {
                cells
                    .get(column)
                    .map(|cell| cell.text().into_owned())
                    .unwrap_or_default()
            }));
            line
        })
        .collect();
    (headers, rows)
}
