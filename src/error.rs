//! Precondition failures raised by the extraction core.
//!
//! Heuristic misses (no title, no header, unparsable cells) are never errors;
//! they surface as `None`, empty collections, or coerced defaults. The
//! variants below only cover indexes a caller could not have obtained from
//! the grid it passed in.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("row {row} is outside a grid of {len} row(s)")]
    RowOutOfRange { row: usize, len: usize },
    #[error("row range {start}..{end} is inverted")]
    InvertedRange { start: usize, end: usize },
    #[error("header row {header} must precede the first data row {data_start}")]
    HeaderAfterData { header: usize, data_start: usize },
}
