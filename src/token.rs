//! Metric kinds, periods and classified header tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    Budget,
    Actual,
    LastYear,
    Growth,
    Achievement,
    Unclassified,
}

impl MetricKind {
    /// Prefix used in canonical column names; `None` for unclassified columns.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            MetricKind::Budget => Some("Budget"),
            MetricKind::Actual => Some("Act"),
            MetricKind::LastYear => Some("LY"),
            MetricKind::Growth => Some("Gr"),
            MetricKind::Achievement => Some("Ach"),
            MetricKind::Unclassified => None,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("Unclassified"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Period {
    /// A single month, e.g. `Apr-24`.
    Month { name: String, year2: String },
    /// A year-to-date span, e.g. `YTD-24-25(Apr-Jun)`.
    YtdRange {
        start_year2: String,
        end_year2: String,
        month_span: String,
    },
}

impl Period {
    pub fn month(name: impl Into<String>, year2: impl Into<String>) -> Self {
        Period::Month {
            name: name.into(),
            year2: year2.into(),
        }
    }

    pub fn ytd(
        start_year2: impl Into<String>,
        end_year2: impl Into<String>,
        month_span: impl Into<String>,
    ) -> Self {
        Period::YtdRange {
            start_year2: start_year2.into(),
            end_year2: end_year2.into(),
            month_span: month_span.into(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Month { name, year2 } => write!(f, "{name}-{year2}"),
            Period::YtdRange {
                start_year2,
                end_year2,
                month_span,
            } => write!(f, "YTD-{start_year2}-{end_year2}({month_span})"),
        }
    }
}

/// One header cell after classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderToken {
    pub raw_text: String,
    pub metric_kind: MetricKind,
    pub period: Option<Period>,
    pub is_identifier_column: bool,
}

impl HeaderToken {
    pub fn identifier(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            metric_kind: MetricKind::Unclassified,
            period: None,
            is_identifier_column: true,
        }
    }

    pub fn unclassified(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            metric_kind: MetricKind::Unclassified,
            period: None,
            is_identifier_column: false,
        }
    }

    pub fn metric(raw_text: impl Into<String>, metric_kind: MetricKind, period: Option<Period>) -> Self {
        Self {
            raw_text: raw_text.into(),
            metric_kind,
            period,
            is_identifier_column: false,
        }
    }

    /// `{MetricKind}-{Period}` for classified columns, the period alone for a
    /// bare YTD column, and the trimmed raw text otherwise.
    pub fn canonical_name(&self) -> String {
        if self.is_identifier_column {
            return self.raw_text.trim().to_string();
        }
        match (self.metric_kind.label(), &self.period) {
            (Some(label), Some(period)) => format!("{label}-{period}"),
            (Some(label), None) => format!("{label}-Unknown"),
            (None, Some(period)) => period.to_string(),
            (None, None) => self.raw_text.trim().to_string(),
        }
    }

    /// Whether the canonical name is built from a metric and a period rather
    /// than copied from the sheet.
    pub fn has_metric_shape(&self) -> bool {
        !self.is_identifier_column
            && (self.metric_kind != MetricKind::Unclassified || self.period.is_some())
    }
}
