//! Table schema assembly from a classified header row.
//!
//! [`build`] classifies the header cells left to right, threading the
//! classified prefix through the fold so growth and achievement columns can
//! see the actual columns before them. It then assigns each column a unique
//! canonical name and, in auditor mode, records how every raw header was
//! renamed.
//!
//! ## Naming
//!
//! - Column 0 is always the identifier column and keeps its sheet label.
//! - Metric columns are named `{MetricKind}-{Period}` and are never suffixed.
//! - Other repeated names (blank headers, repeated raw text) get `_1`, `_2`,
//!   ... on their second and later occurrences.

use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::BufReader,
    path::Path,
};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    boundary::IdentifierKeywords,
    classify::ClassificationRuleSet,
    token::{HeaderToken, MetricKind},
};

const UNNAMED_COLUMN: &str = "Unnamed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaColumn {
    pub canonical_name: String,
    pub token: HeaderToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub raw_header: String,
    pub canonical_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<SchemaColumn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_trail: Option<Vec<AuditEntry>>,
}

impl Schema {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| column.canonical_name.clone())
            .collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.canonical_name == name)
    }

    pub fn identifier(&self) -> Option<&SchemaColumn> {
        self.columns.first().filter(|c| c.token.is_identifier_column)
    }

    pub fn metric_columns(&self, metric: MetricKind) -> impl Iterator<Item = &SchemaColumn> {
        self.columns
            .iter()
            .filter(move |column| column.token.metric_kind == metric)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating schema file {path:?}"))?;
        serde_yaml::to_writer(file, self).context("Writing schema YAML")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening schema file {path:?}"))?;
        let reader = BufReader::new(file);
        let schema = serde_yaml::from_reader(reader).context("Parsing schema YAML")?;
        Ok(schema)
    }
}

/// Builds a schema with the standard classification rules.
pub fn build<S: AsRef<str>>(header_row: &[S], product_analysis: bool, auditor_mode: bool) -> Schema {
    build_with_rules(
        &ClassificationRuleSet::standard(),
        header_row,
        product_analysis,
        auditor_mode,
    )
}

pub fn build_with_rules<S: AsRef<str>>(
    rules: &ClassificationRuleSet,
    header_row: &[S],
    product_analysis: bool,
    auditor_mode: bool,
) -> Schema {
    let keywords = IdentifierKeywords::for_mode(product_analysis);
    let tokens = header_row
        .iter()
        .enumerate()
        .fold(Vec::with_capacity(header_row.len()), |mut classified, (idx, raw)| {
            let raw = raw.as_ref();
            let token = if idx == 0 {
                identifier_token(raw, keywords)
            } else {
                let token = rules.classify(raw, &classified);
                if token.is_identifier_column {
                    HeaderToken::unclassified(token.raw_text)
                } else {
                    token
                }
            };
            classified.push(token);
            classified
        });

    let names = resolve_names(&tokens);
    let audit_trail = auditor_mode.then(|| {
        tokens
            .iter()
            .zip(&names)
            .map(|(token, name)| AuditEntry {
                raw_header: token.raw_text.clone(),
                canonical_name: name.clone(),
            })
            .collect::<Vec<_>>()
    });
    if let Some(trail) = &audit_trail {
        for entry in trail {
            debug!("'{}' -> '{}'", entry.raw_header, entry.canonical_name);
        }
    }

    let columns = tokens
        .into_iter()
        .zip(names)
        .map(|(token, canonical_name)| SchemaColumn {
            canonical_name,
            token,
        })
        .collect::<Vec<_>>();
    debug!("Built schema with {} column(s)", columns.len());
    Schema {
        columns,
        audit_trail,
    }
}

fn identifier_token(raw: &str, keywords: IdentifierKeywords) -> HeaderToken {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        HeaderToken::identifier(keywords.default_label())
    } else {
        HeaderToken::identifier(trimmed)
    }
}

fn resolve_names(tokens: &[HeaderToken]) -> Vec<String> {
    let mut occurrences: HashMap<String, usize> = HashMap::new();
    let mut used: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(tokens.len());

    for token in tokens {
        let mut base = token.canonical_name();
        if base.is_empty() {
            base = UNNAMED_COLUMN.to_string();
        }
        let name = if token.has_metric_shape() {
            base
        } else {
            let seen = occurrences.entry(base.clone()).or_insert(0);
            let name = if *seen == 0 {
                base.clone()
            } else {
                let mut n = *seen;
                let mut candidate = format!("{base}_{n}");
                while used.contains(&candidate) {
                    n += 1;
                    candidate = format!("{base}_{n}");
                }
                candidate
            };
            *seen += 1;
            name
        };
        used.insert(name.clone());
        names.push(name);
    }
    names
}
