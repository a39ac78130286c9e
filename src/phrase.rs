//! Title-row phrase matching.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::cell::Cell;

/// A named group of phrases that identifies one table's title row, such as
/// `["SALES IN MT", "SALES IN QTY"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseSet {
    pub name: String,
    pub phrases: Vec<String>,
}

impl PhraseSet {
    pub fn new<I, S>(name: impl Into<String>, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            phrases: phrases.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, row: &[Cell]) -> bool {
        matches(row, &self.phrases)
    }
}

/// Joins the non-empty cells of `row` (lower-cased) and reports whether any
/// phrase occurs in the result.
pub fn matches<S: AsRef<str>>(row: &[Cell], phrases: &[S]) -> bool {
    let joined = row_text(row);
    if joined.is_empty() {
        return false;
    }
    phrases.iter().any(|phrase| {
        let needle = phrase.as_ref().trim().to_lowercase();
        !needle.is_empty() && joined.contains(&needle)
    })
}

fn row_text(row: &[Cell]) -> String {
    row.iter()
        .filter(|cell| !cell.is_blank())
        .map(|cell| cell.text().trim().to_lowercase())
        .join(" ")
}
