//! Plain-text table rendering for terminal output.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// Renders `rows` under `headers`. Columns whose non-empty values are all
/// numeric are right-aligned.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }
    for width in &mut widths {
        *width = (*width).max(3);
    }
    let alignment = (0..column_count)
        .map(|idx| column_alignment(rows, idx))
        .collect::<Vec<_>>();

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths, &alignment));
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &widths, &alignment));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths, &alignment));
    }
    output
}

/// Renders typed cells, formatting numbers the way the grid shows them.
pub fn render_cells(headers: &[String], rows: &[Vec<Cell>]) -> String {
    let text_rows = rows
        .iter()
        .map(|row| row.iter().map(|cell| cell.text().into_owned()).collect())
        .collect::<Vec<Vec<String>>>();
    render_table(headers, &text_rows)
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn column_alignment(rows: &[Vec<String>], idx: usize) -> Align {
    let mut values = rows
        .iter()
        .filter_map(|row| row.get(idx))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .peekable();
    if values.peek().is_none() {
        return Align::Left;
    }
    if values.all(|value| value.parse::<f64>().is_ok()) {
        Align::Right
    } else {
        Align::Left
    }
}

fn format_row(values: &[String], widths: &[usize], alignment: &[Align]) -> String {
    let mut line = String::new();
    for (idx, (value, width)) in values.iter().zip(widths).enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        let sanitized = sanitize_cell(value);
        let padding = " ".repeat(width.saturating_sub(display_width(&sanitized)));
        match alignment.get(idx).copied().unwrap_or(Align::Left) {
            Align::Left => {
                line.push_str(&sanitized);
                line.push_str(&padding);
            }
            Align::Right => {
                line.push_str(&padding);
                line.push_str(&sanitized);
            }
        }
    }
    line.truncate(line.trim_end().len());
    line
}

fn display_width(value: &str) -> usize {
    let mut width = 0usize;
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            // ANSI escape, e.g. \x1b[31m
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
