//! Header-cell classification into `(metric, period)` identities.
//!
//! Classification runs an ordered [`ClassificationRuleSet`]; the first rule
//! whose pattern matches produces the [`HeaderToken`]. Rules are immutable
//! once built, so a rule set can be shared across threads and individual
//! rules can be exercised on their own.
//!
//! Growth and achievement columns without their own period inherit the period
//! of the nearest actual column to their left. The caller supplies the
//! already-classified prefix of the row, which makes `classify` a pure
//! function of its inputs.

use std::{str::FromStr, sync::OnceLock};

use chrono::{Month, NaiveDate};
use log::trace;
use regex::{Captures, Regex};

use crate::token::{HeaderToken, MetricKind, Period};

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";
const YEAR: &str = r"(?:\d{4}|\d{2})";
const SEP: &str = r"[-_ '.,/]*";

const BUDGET: &str = r"(?:budget|bgt)";
const ACTUAL: &str = r"(?:act(?:ual)?s?)";
const LAST_YEAR: &str = r"(?:ly|l\.y\.?|l,y|last[-_ ]?year)";
const GROWTH: &str = r"(?:growth|gr)";
const ACHIEVEMENT: &str = r"(?:achievement|ach)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Identifier,
    PassThrough,
    Budget,
    Actual,
    YearToDate,
    BareGrowth,
    Growth,
    BareAchievement,
    Achievement,
    LastYear,
    BareMonth,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct ClassificationRule {
    kind: RuleKind,
    patterns: Vec<Regex>,
}

impl ClassificationRule {
    pub fn new(kind: RuleKind) -> Self {
        let sources = match kind {
            RuleKind::Identifier => vec![r"^(?:product|region|branch|organi[sz]ation)".to_string()],
            RuleKind::PassThrough => vec![r"^(?:mt|rs|total)$".to_string()],
            RuleKind::Budget => metric_period_patterns(BUDGET),
            RuleKind::Actual => metric_period_patterns(ACTUAL),
            RuleKind::YearToDate => vec![ytd_pattern()],
            RuleKind::BareGrowth => vec![format!(r"^{GROWTH}\.?\s*%?$")],
            RuleKind::Growth => metric_period_patterns(GROWTH),
            RuleKind::BareAchievement => vec![format!(r"^{ACHIEVEMENT}\.?\s*%?$")],
            RuleKind::Achievement => metric_period_patterns(ACHIEVEMENT),
            RuleKind::LastYear => metric_period_patterns(LAST_YEAR),
            RuleKind::BareMonth => vec![
                format!(r"^{}$", period_pattern()),
                r"^(?P<iso_date>\d{4}-\d{2}-\d{2})(?:[ t]\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?)?$"
                    .to_string(),
            ],
            RuleKind::Fallback => Vec::new(),
        };
        let patterns = sources
            .iter()
            .map(|source| Regex::new(&format!("(?i){source}")).expect("built-in pattern compiles"))
            .collect();
        Self { kind, patterns }
    }

    /// Applies this rule alone. `header` must already be normalized (see
    /// [`normalize_header`]); `raw` is kept verbatim on the token.
    pub fn apply(&self, header: &str, raw: &str, preceding: &[HeaderToken]) -> Option<HeaderToken> {
        if self.kind == RuleKind::Fallback {
            return Some(HeaderToken::unclassified(raw));
        }
        let captures = self.patterns.iter().find_map(|re| re.captures(header))?;
        match self.kind {
            RuleKind::Identifier => Some(HeaderToken::identifier(raw)),
            RuleKind::PassThrough => Some(HeaderToken::unclassified(raw)),
            RuleKind::Budget => month_token(raw, MetricKind::Budget, &captures),
            RuleKind::Actual | RuleKind::BareMonth => month_token(raw, MetricKind::Actual, &captures),
            RuleKind::Growth => month_token(raw, MetricKind::Growth, &captures),
            RuleKind::Achievement => month_token(raw, MetricKind::Achievement, &captures),
            RuleKind::LastYear => month_token(raw, MetricKind::LastYear, &captures),
            RuleKind::YearToDate => Some(ytd_token(raw, &captures)),
            RuleKind::BareGrowth => Some(derived_token(raw, MetricKind::Growth, preceding)),
            RuleKind::BareAchievement => {
                Some(derived_token(raw, MetricKind::Achievement, preceding))
            }
            RuleKind::Fallback => None,
        }
    }
}

/// Ordered rules; first match wins.
#[derive(Debug, Clone)]
pub struct ClassificationRuleSet {
    rules: Vec<ClassificationRule>,
}

impl Default for ClassificationRuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl ClassificationRuleSet {
    pub const STANDARD_ORDER: [RuleKind; 12] = [
        RuleKind::Identifier,
        RuleKind::PassThrough,
        RuleKind::Budget,
        RuleKind::Actual,
        RuleKind::YearToDate,
        RuleKind::BareGrowth,
        RuleKind::Growth,
        RuleKind::BareAchievement,
        RuleKind::Achievement,
        RuleKind::LastYear,
        RuleKind::BareMonth,
        RuleKind::Fallback,
    ];

    pub fn standard() -> Self {
        Self::from_kinds(&Self::STANDARD_ORDER)
    }

    pub fn from_kinds(kinds: &[RuleKind]) -> Self {
        Self {
            rules: kinds.iter().map(|kind| ClassificationRule::new(*kind)).collect(),
        }
    }

    /// Classifies one header cell given the tokens already classified to its
    /// left in the same row. A header no rule accepts is kept unclassified.
    pub fn classify(&self, header: &str, preceding: &[HeaderToken]) -> HeaderToken {
        let raw = header.trim();
        let normalized = normalize_header(raw);
        for rule in &self.rules {
            if let Some(token) = rule.apply(&normalized, raw, preceding) {
                trace!("Header '{raw}' classified by {:?}", rule.kind);
                return token;
            }
        }
        HeaderToken::unclassified(raw)
    }
}

static STANDARD_RULES: OnceLock<ClassificationRuleSet> = OnceLock::new();

/// Classifies with the standard rule set, compiled on first use and shared
/// afterwards.
pub fn classify(header: &str, preceding: &[HeaderToken]) -> HeaderToken {
    STANDARD_RULES
        .get_or_init(ClassificationRuleSet::standard)
        .classify(header, preceding)
}

/// Trims and maps en/em dashes to `-`.
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .chars()
        .map(|ch| match ch {
            '\u{2013}' | '\u{2014}' => '-',
            other => other,
        })
        .collect()
}

/// Canonical three-letter month (`Apr`) for any accepted spelling.
pub fn canonical_month(token: &str) -> Option<String> {
    let prefix: String = token.chars().take(3).collect::<String>().to_lowercase();
    let month = Month::from_str(&prefix).ok()?;
    Some(month.name().chars().take(3).collect())
}

/// Low-order two digits of a two- or four-digit year.
pub fn year_suffix(year: &str) -> String {
    let digits: Vec<char> = year.chars().filter(char::is_ascii_digit).collect();
    let start = digits.len().saturating_sub(2);
    let mut suffix: String = digits[start..].iter().collect();
    while suffix.len() < 2 {
        suffix.insert(0, '0');
    }
    suffix
}

fn period_pattern() -> String {
    format!(
        r"(?:(?P<m1>{MONTH}){SEP}(?P<y1>{YEAR})|(?P<y2>{YEAR}){SEP}(?P<m2>{MONTH}))"
    )
}

fn metric_period_patterns(metric: &str) -> Vec<String> {
    let period = period_pattern();
    vec![
        format!(r"^{metric}{SEP}{period}$"),
        format!(r"^{period}{SEP}{metric}\.?$"),
    ]
}

fn ytd_pattern() -> String {
    let metric = format!("{BUDGET}|{ACTUAL}|{LAST_YEAR}|{GROWTH}|{ACHIEVEMENT}");
    format!(
        r"^(?:(?P<prefix>{metric}){SEP})?ytd{SEP}(?P<start>{YEAR}){SEP}(?P<end>{YEAR})\s*\((?P<span>[^)]*)\)(?:{SEP}(?P<suffix>{metric})\.?)?$"
    )
}

fn period_from_captures(captures: &Captures<'_>) -> Option<Period> {
    if let Some(date) = captures.name("iso_date") {
        let date = NaiveDate::parse_from_str(date.as_str(), "%Y-%m-%d").ok()?;
        return Some(Period::month(
            date.format("%b").to_string(),
            date.format("%y").to_string(),
        ));
    }
    let month = captures.name("m1").or_else(|| captures.name("m2"))?;
    let year = captures.name("y1").or_else(|| captures.name("y2"))?;
    Some(Period::month(
        canonical_month(month.as_str())?,
        year_suffix(year.as_str()),
    ))
}

fn month_token(raw: &str, metric: MetricKind, captures: &Captures<'_>) -> Option<HeaderToken> {
    let period = period_from_captures(captures)?;
    Some(HeaderToken::metric(raw, metric, Some(period)))
}

fn ytd_token(raw: &str, captures: &Captures<'_>) -> HeaderToken {
    let start = captures.name("start").map_or("", |m| m.as_str());
    let end = captures.name("end").map_or("", |m| m.as_str());
    let span = captures.name("span").map_or("", |m| m.as_str());
    let period = Period::ytd(year_suffix(start), year_suffix(end), month_span_label(span));

    let explicit = captures
        .name("prefix")
        .or_else(|| captures.name("suffix"))
        .and_then(|label| metric_from_label(label.as_str()));
    let metric = explicit.unwrap_or_else(|| {
        if raw.to_lowercase().contains("act") {
            MetricKind::Actual
        } else {
            MetricKind::Unclassified
        }
    });
    HeaderToken::metric(raw, metric, Some(period))
}

/// Growth/achievement without a period of their own take the period of the
/// most recent actual column to their left.
fn derived_token(raw: &str, metric: MetricKind, preceding: &[HeaderToken]) -> HeaderToken {
    let period = preceding
        .iter()
        .rev()
        .find(|token| token.metric_kind == MetricKind::Actual)
        .and_then(|token| token.period.clone());
    HeaderToken::metric(raw, metric, period)
}

fn metric_from_label(label: &str) -> Option<MetricKind> {
    let compact: String = label
        .chars()
        .filter(|ch| ch.is_ascii_alphabetic())
        .collect::<String>()
        .to_lowercase();
    match compact.as_str() {
        "budget" | "bgt" => Some(MetricKind::Budget),
        "ly" | "lastyear" => Some(MetricKind::LastYear),
        "gr" | "growth" => Some(MetricKind::Growth),
        "ach" | "achievement" => Some(MetricKind::Achievement),
        other if other.starts_with("act") => Some(MetricKind::Actual),
        _ => None,
    }
}

/// `apr-jun` → `Apr-Jun`; spans that are not month names are kept trimmed.
fn month_span_label(span: &str) -> String {
    let parts: Vec<&str> = span
        .split(|ch: char| ch == '-' || ch.is_whitespace())
        .filter(|part| !part.is_empty() && !part.eq_ignore_ascii_case("to"))
        .collect();
    let months: Option<Vec<String>> = parts.iter().map(|part| canonical_month(part)).collect();
    match months {
        Some(months) if !months.is_empty() => months.join("-"),
        _ => span.trim().to_string(),
    }
}
