//! Free-text column-role matching.
//!
//! Scores an arbitrary column header against a catalogue of semantic roles
//! ("executive code", "branch", ...) so a mapping screen can pre-select the
//! most likely role. Matching is purely lexical:
//!
//! - an exact match after normalization scores `1.0` and ends the search;
//! - a phrase contained in the column name scores `len(phrase) / len(name)`
//!   and only counts at [`MIN_CONTAINMENT_SCORE`] or above;
//! - a short column name (at most [`MAX_ABBREVIATION_LEN`] characters)
//!   contained in a phrase scores `len(name) / len(phrase)`.

use serde::{Deserialize, Serialize};

pub const MIN_CONTAINMENT_SCORE: f64 = 0.6;
pub const MAX_ABBREVIATION_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCatalogEntry {
    pub role: String,
    pub candidate_phrases: Vec<String>,
}

impl RoleCatalogEntry {
    pub fn new<I, S>(role: impl Into<String>, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            role: role.into(),
            candidate_phrases: phrases.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleSuggestion {
    pub role: String,
    pub score: f64,
}

/// Trims, lower-cases and collapses whitespace, `_` and `-` runs to one space.
pub fn normalize(value: &str) -> String {
    value
        .split(|ch: char| ch.is_whitespace() || ch == '_' || ch == '-')
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Best score of `column_name` against any phrase of `role`, in `[0, 1]`.
pub fn suggest(column_name: &str, role: &RoleCatalogEntry) -> f64 {
    let column = normalize(column_name);
    score_normalized(&column, role)
}

fn score_normalized(column: &str, role: &RoleCatalogEntry) -> f64 {
    let column_len = column.chars().count();
    if column_len == 0 {
        return 0.0;
    }
    let mut best = 0.0f64;
    for phrase in &role.candidate_phrases {
        let phrase = normalize(phrase);
        let phrase_len = phrase.chars().count();
        if phrase_len == 0 {
            continue;
        }
        if phrase == column {
            return 1.0;
        }
        let score = if column.contains(phrase.as_str()) {
            let ratio = phrase_len as f64 / column_len as f64;
            if ratio >= MIN_CONTAINMENT_SCORE { ratio } else { 0.0 }
        } else if column_len <= MAX_ABBREVIATION_LEN && phrase.contains(column) {
            column_len as f64 / phrase_len as f64
        } else {
            0.0
        };
        best = best.max(score);
    }
    best
}

/// Highest-scoring role for `column_name`; ties go to the role declared
/// first. `None` when no role scores above zero.
pub fn best_role(column_name: &str, catalogue: &[RoleCatalogEntry]) -> Option<RoleSuggestion> {
    let column = normalize(column_name);
    let mut best: Option<RoleSuggestion> = None;
    for entry in catalogue {
        let score = score_normalized(&column, entry);
        if score >= 1.0 {
            return Some(RoleSuggestion {
                role: entry.role.clone(),
                score,
            });
        }
        let improves = best.as_ref().is_none_or(|current| score > current.score);
        if score > 0.0 && improves {
            best = Some(RoleSuggestion {
                role: entry.role.clone(),
                score,
            });
        }
    }
    best
}

/// Suggestion for each column, in input order.
pub fn suggest_mappings<S: AsRef<str>>(
    columns: &[S],
    catalogue: &[RoleCatalogEntry],
) -> Vec<(String, Option<RoleSuggestion>)> {
    columns
        .iter()
        .map(|column| {
            let column = column.as_ref();
            (column.to_string(), best_role(column, catalogue))
        })
        .collect()
}

/// Roles the executive/branch mapping screens ask for.
pub fn standard_catalogue() -> Vec<RoleCatalogEntry> {
    vec![
        RoleCatalogEntry::new(
            "executive_code",
            ["executive code", "exec code", "emp code", "employee code", "sales rep code"],
        ),
        RoleCatalogEntry::new(
            "executive_name",
            ["executive name", "exec name", "executive", "sales executive", "employee name", "sales rep"],
        ),
        RoleCatalogEntry::new("branch", ["branch", "branch name", "branch code", "location"]),
        RoleCatalogEntry::new("region", ["region", "region name", "zone", "area"]),
        RoleCatalogEntry::new(
            "product",
            ["product", "product name", "product group", "item", "material"],
        ),
        RoleCatalogEntry::new(
            "customer",
            ["customer", "customer name", "customer code", "party name", "dealer"],
        ),
        RoleCatalogEntry::new("quantity", ["quantity", "qty", "quantity in mt", "sales qty"]),
        RoleCatalogEntry::new("value", ["value", "sales value", "amount", "net value"]),
        RoleCatalogEntry::new("date", ["date", "invoice date", "bill date", "month"]),
    ]
}
