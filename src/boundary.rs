//! Header and data-row resolution for one located title.
//!
//! The resolver tries an ordered list of rules and returns the first bounds
//! any rule produces:
//!
//! 1. the title row itself carries sub-header tokens (`Budget-…`, `Act-…`);
//! 2. the row below the title carries them (blank separator row);
//! 3. an identifier row (`REGIONS`, `PRODUCT …`) appears within a few rows and
//!    the real header sits one or two rows above it.
//!
//! A table for which no rule fires is absent; that is not an error.

use log::debug;
use serde::Serialize;

use crate::{cell::Cell, classify::normalize_header, error::GridError, grid::Grid};

/// Lower-cased prefixes that mark a row as a metric sub-header.
const SUB_HEADER_PREFIXES: &[&str] = &["budget-", "act-", "ly-", "gr.", "ach."];
/// Row labels that sit between a header and its data.
const SENTINEL_ROW_LABELS: &[&str] = &["ACCLLP", "TOTAL SALES"];
/// Cells a units row is made of.
const UNIT_TOKENS: &[&str] = &["MT", "RS", ""];
/// How far below a title the identifier row may appear.
const IDENTIFIER_SCAN_ROWS: usize = 4;

/// Keywords that mark the leading identifier column of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierKeywords {
    exact: &'static [&'static str],
    prefixes: &'static [&'static str],
}

pub const REGION_KEYWORDS: IdentifierKeywords = IdentifierKeywords {
    exact: &["REGIONS", "REGION", "BRANCH", "BRANCHES"],
    prefixes: &["ORGANIZATION", "ORGANISATION"],
};

pub const PRODUCT_KEYWORDS: IdentifierKeywords = IdentifierKeywords {
    exact: &[],
    prefixes: &["PRODUCT"],
};

impl IdentifierKeywords {
    pub fn for_mode(product_analysis: bool) -> Self {
        if product_analysis {
            PRODUCT_KEYWORDS
        } else {
            REGION_KEYWORDS
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        let upper = text.trim().to_uppercase();
        if upper.is_empty() {
            return false;
        }
        self.exact.contains(&upper.as_str())
            || self.prefixes.iter().any(|prefix| upper.starts_with(prefix))
    }

    /// Identifier column name used when the sheet does not label it.
    pub fn default_label(&self) -> &'static str {
        if self.exact.is_empty() {
            "PRODUCT"
        } else {
            "REGIONS"
        }
    }
}

/// Row layout of one table. `data_start..data_end` is half-open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableBounds {
    pub title_row: usize,
    pub header_row: usize,
    pub data_start: usize,
    pub data_end: usize,
    /// Name of the identifier column when the sheet spells it out.
    pub identifier_label: Option<String>,
}

struct BoundaryContext<'a> {
    grid: &'a Grid,
    title_row: usize,
    data_end: usize,
    keywords: IdentifierKeywords,
}

type BoundaryRule = fn(&BoundaryContext<'_>) -> Option<TableBounds>;

const BOUNDARY_RULES: &[(&str, BoundaryRule)] = &[
    ("title-row sub-header", sniff_title_row),
    ("next-row sub-header", sniff_next_row),
    ("identifier scan", scan_identifier_row),
];

/// Resolves header and data rows for the title on `title_row`.
///
/// `next_title_row` bounds the table from below; `None` means the table runs
/// to the end of the grid.
pub fn resolve(
    grid: &Grid,
    title_row: usize,
    next_title_row: Option<usize>,
    product_analysis: bool,
) -> Result<Option<TableBounds>, GridError> {
    if title_row >= grid.len() {
        return Err(GridError::RowOutOfRange {
            row: title_row,
            len: grid.len(),
        });
    }
    let data_end = next_title_row.unwrap_or(grid.len());
    if data_end > grid.len() {
        return Err(GridError::RowOutOfRange {
            row: data_end,
            len: grid.len(),
        });
    }
    if data_end <= title_row {
        return Err(GridError::InvertedRange {
            start: title_row,
            end: data_end,
        });
    }

    let context = BoundaryContext {
        grid,
        title_row,
        data_end,
        keywords: IdentifierKeywords::for_mode(product_analysis),
    };
    for (name, rule) in BOUNDARY_RULES {
        if let Some(bounds) = rule(&context) {
            debug!(
                "Title row {} resolved by {}: header {}, data {}..{}",
                title_row, name, bounds.header_row, bounds.data_start, bounds.data_end
            );
            return Ok(Some(bounds));
        }
    }
    debug!("No header found below title row {title_row}");
    Ok(None)
}

fn sniff_title_row(ctx: &BoundaryContext<'_>) -> Option<TableBounds> {
    sniff_sub_header(ctx, ctx.title_row)
}

fn sniff_next_row(ctx: &BoundaryContext<'_>) -> Option<TableBounds> {
    sniff_sub_header(ctx, ctx.title_row + 1)
}

fn sniff_sub_header(ctx: &BoundaryContext<'_>, anchor: usize) -> Option<TableBounds> {
    if anchor >= ctx.data_end || !has_sub_header_tokens(ctx.grid.row(anchor)?) {
        return None;
    }
    let header_label = ctx.grid.first_text(anchor);
    let below = anchor + 1;
    let below_label = if below < ctx.data_end {
        ctx.grid.first_text(below)
    } else {
        String::new()
    };
    let below_is_identifier = ctx.keywords.matches(&below_label);
    let below_is_sentinel = SENTINEL_ROW_LABELS
        .iter()
        .any(|label| below_label.eq_ignore_ascii_case(label));

    let data_start = if below_is_identifier || below_is_sentinel {
        anchor + 2
    } else {
        anchor + 1
    };
    let identifier_label = if ctx.keywords.matches(&header_label) {
        Some(header_label)
    } else if below_is_identifier {
        Some(below_label)
    } else {
        None
    };
    Some(TableBounds {
        title_row: ctx.title_row,
        header_row: anchor,
        data_start: data_start.min(ctx.data_end),
        data_end: ctx.data_end,
        identifier_label,
    })
}

fn scan_identifier_row(ctx: &BoundaryContext<'_>) -> Option<TableBounds> {
    let scan_end = (ctx.title_row + IDENTIFIER_SCAN_ROWS + 1).min(ctx.data_end);
    let identifier_row = (ctx.title_row + 1..scan_end)
        .find(|row| ctx.keywords.matches(&ctx.grid.first_text(*row)))?;

    // Nearest-to-title first, so an ambiguous pair resolves toward the title.
    // The title row itself only becomes a header through the sub-header sniff.
    let candidates = [identifier_row.checked_sub(2), identifier_row.checked_sub(1)];
    let qualifying: Vec<usize> = candidates
        .into_iter()
        .flatten()
        .filter(|row| *row > ctx.title_row)
        .filter(|row| {
            ctx.grid
                .row(*row)
                .is_some_and(|cells| !is_units_only(cells))
        })
        .collect();
    if qualifying.len() > 1 {
        debug!(
            "Rows {:?} both qualify as header above identifier row {}; using row {}",
            qualifying, identifier_row, qualifying[0]
        );
    }
    let header_row = qualifying.first().copied().unwrap_or(identifier_row);

    Some(TableBounds {
        title_row: ctx.title_row,
        header_row,
        data_start: identifier_row + 1,
        data_end: ctx.data_end,
        identifier_label: Some(ctx.grid.first_text(identifier_row)),
    })
}

fn has_sub_header_tokens(row: &[Cell]) -> bool {
    row.iter().skip(1).any(|cell| {
        let lowered = normalize_header(&cell.text()).to_lowercase();
        SUB_HEADER_PREFIXES
            .iter()
            .any(|prefix| lowered.starts_with(prefix))
    })
}

fn is_units_only(row: &[Cell]) -> bool {
    row.iter().skip(1).all(|cell| {
        let upper = cell.text().trim().to_uppercase();
        UNIT_TOKENS.contains(&upper.as_str())
    })
}
