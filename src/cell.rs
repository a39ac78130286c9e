//! Cell values and per-column coercion.
//!
//! Every grid position holds a [`Cell`]. Columns are coerced under a
//! [`CoercionPolicy`]: the identifier column keeps cleaned text, every other
//! column becomes a number. Coercion never fails; anything that cannot be
//! read under the policy falls back to `0.0` or an empty string.

use std::{borrow::Cow, fmt};

use log::trace;
use serde::{Deserialize, Serialize};

/// Tokens that stand for "no value" in exported reports.
const SENTINEL_TOKENS: &[&str] = &["", "-", "nan", "none", "null"];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionPolicy {
    AsIdentifier,
    AsNumeric,
}

impl Cell {
    /// Builds a cell from one delimited-text field: blanks are empty, anything
    /// that parses as a plain number is numeric, the rest stays text.
    pub fn from_field(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(number) if number.is_finite() => Cell::Number(number),
            _ => Cell::Text(field.to_string()),
        }
    }

    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Cell::Number(n) => Cow::Owned(format_number(*n)),
            Cell::Text(s) => Cow::Borrowed(s.as_str()),
            Cell::Empty => Cow::Borrowed(""),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Renders a number the way a spreadsheet shows it: integral values drop the
/// fractional part.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

pub fn coerce(raw: &Cell, policy: CoercionPolicy) -> Cell {
    match policy {
        CoercionPolicy::AsIdentifier => Cell::Text(normalize_identifier(raw)),
        CoercionPolicy::AsNumeric => Cell::Number(coerce_numeric(raw)),
    }
}

/// Trims, collapses internal whitespace and blanks out sentinel tokens.
pub fn normalize_identifier(raw: &Cell) -> String {
    let text = raw.text();
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if is_sentinel_token(&collapsed.to_ascii_lowercase()) && collapsed != "-" {
        return String::new();
    }
    collapsed
}

pub fn coerce_numeric(raw: &Cell) -> f64 {
    match raw {
        Cell::Number(n) if n.is_finite() => *n,
        Cell::Number(_) | Cell::Empty => 0.0,
        Cell::Text(text) => parse_numeric_text(text).unwrap_or_else(|| {
            trace!("Coercing non-numeric value '{text}' to 0");
            0.0
        }),
    }
}

/// Reads report-style numeric text: grouping commas, accounting negatives
/// such as `(12.5)` and a trailing percent sign are accepted.
pub fn parse_numeric_text(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if is_sentinel_token(&trimmed.to_ascii_lowercase()) {
        return None;
    }
    let (negative, body) = match trimmed
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(inner) => (true, inner.trim()),
        None => (false, trimmed),
    };
    let body = body.strip_suffix('%').unwrap_or(body).trim_end();
    let cleaned: String = body.chars().filter(|ch| *ch != ',').collect();
    let parsed = cleaned.parse::<f64>().ok().filter(|n| n.is_finite())?;
    Some(if negative { -parsed } else { parsed })
}

pub fn is_sentinel_token(lowered: &str) -> bool {
    SENTINEL_TOKENS.contains(&lowered)
}
