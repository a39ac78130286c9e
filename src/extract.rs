//! The extraction pipeline and the `extract` / `locate` commands.
//!
//! For every located title the pipeline resolves the table bounds, builds a
//! schema from the header row and materializes the data rows. Tables whose
//! header cannot be found are skipped; only structurally impossible row
//! arithmetic surfaces as a [`GridError`].

use std::io::Write;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;

use crate::{
    boundary::{self, IdentifierKeywords, TableBounds},
    cell::Cell,
    classify::ClassificationRuleSet,
    cli::{ExtractArgs, ExtractionArgs, GridInputArgs, LocateArgs, OutputFormat},
    config::ExtractConfig,
    error::GridError,
    grid::{self, Grid},
    io_utils,
    locate::{self, LocatedTitle},
    materialize::{Table, materialize},
    schema::{self, AuditEntry},
    table,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedTable {
    /// Name of the phrase set that located the table.
    pub name: String,
    pub bounds: TableBounds,
    pub table: Table,
}

/// Serialized shape of one extracted table.
#[derive(Debug, Serialize)]
pub struct TableReport<'a> {
    pub name: &'a str,
    pub title_row: usize,
    pub header_row: usize,
    pub data_start: usize,
    pub data_end: usize,
    pub columns: Vec<String>,
    pub rows: &'a [Vec<Cell>],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit: Option<&'a [AuditEntry]>,
}

impl ExtractedTable {
    pub fn report(&self) -> TableReport<'_> {
        TableReport {
            name: &self.name,
            title_row: self.bounds.title_row,
            header_row: self.bounds.header_row,
            data_start: self.bounds.data_start,
            data_end: self.bounds.data_end,
            columns: self.table.columns(),
            rows: &self.table.rows,
            audit: self.table.schema.audit_trail.as_deref(),
        }
    }
}

/// Locates every title and resolves its bounds. Each table ends where the
/// next located title begins.
pub fn resolve_all(
    grid: &Grid,
    config: &ExtractConfig,
) -> Result<Vec<(LocatedTitle, Option<TableBounds>)>, GridError> {
    let titles = locate::locate(grid, &config.phrase_sets);
    titles
        .iter()
        .enumerate()
        .map(|(idx, title)| -> Result<_, GridError> {
            let next_title_row = titles.get(idx + 1).map(|next| next.row);
            let bounds =
                boundary::resolve(grid, title.row, next_title_row, config.product_analysis)?;
            Ok((*title, bounds))
        })
        .collect()
}

/// Runs the full pipeline over `grid`, returning tables in sheet order.
pub fn extract_tables(grid: &Grid, config: &ExtractConfig) -> Result<Vec<ExtractedTable>, GridError> {
    let rules = ClassificationRuleSet::standard();
    let keywords = IdentifierKeywords::for_mode(config.product_analysis);
    let mut tables = Vec::new();

    for (title, bounds) in resolve_all(grid, config)? {
        let name = config.phrase_sets[title.phrase_set].name.clone();
        let Some(bounds) = bounds else {
            info!("Skipping '{}' on row {}: no header found", name, title.row);
            continue;
        };
        let headers = header_texts(grid, &bounds, keywords);
        let schema = schema::build_with_rules(
            &rules,
            &headers,
            config.product_analysis,
            config.auditor_mode,
        );
        let table = materialize(
            grid,
            bounds.header_row,
            bounds.data_start,
            bounds.data_end,
            &schema,
        )?;
        debug!(
            "Table '{}': {} column(s), {} row(s)",
            name,
            table.schema.len(),
            table.row_count()
        );
        tables.push(ExtractedTable {
            name,
            bounds,
            table,
        });
    }
    Ok(tables)
}

/// Header cells up to the last non-blank one. A first cell that is not an
/// identifier keyword (a title, a blank) is replaced by the identifier label
/// found nearby, or the mode default.
fn header_texts(grid: &Grid, bounds: &TableBounds, keywords: IdentifierKeywords) -> Vec<String> {
    let width = grid
        .row(bounds.header_row)
        .and_then(|cells| cells.iter().rposition(|cell| !cell.is_blank()))
        .map_or(1, |last| last + 1);
    let mut headers = (0..width)
        .map(|column| grid.cell(bounds.header_row, column).text().trim().to_string())
        .collect::<Vec<_>>();
    if !keywords.matches(&headers[0]) {
        headers[0] = bounds
            .identifier_label
            .clone()
            .unwrap_or_else(|| keywords.default_label().to_string());
    }
    headers
}

pub fn execute(args: &ExtractArgs) -> Result<()> {
    let config = load_config(&args.extraction)?;
    let grid = load_input(&args.grid)?;
    let tables = extract_tables(&grid, &config)
        .with_context(|| format!("Extracting tables from {:?}", args.grid.input))?;
    info!(
        "Extracted {} of {} table(s) from {:?}",
        tables.len(),
        config.phrase_sets.len(),
        args.grid.input
    );

    let mut writer = io_utils::open_output(args.output.as_deref())?;
    match args.format {
        OutputFormat::Json => write_json(&mut writer, &tables)?,
        OutputFormat::Csv => write_csv(&mut writer, &tables)?,
        OutputFormat::Table => write_text(&mut writer, &tables)?,
    }
    writer.flush().context("Flushing output")?;
    if let Some(path) = &args.output {
        info!("Tables written to {path:?}");
    }
    Ok(())
}

pub fn execute_locate(args: &LocateArgs) -> Result<()> {
    let config = load_config(&args.extraction)?;
    let grid = load_input(&args.grid)?;
    let resolved = resolve_all(&grid, &config)
        .with_context(|| format!("Resolving tables in {:?}", args.grid.input))?;

    let headers = [
        "table",
        "title_row",
        "header_row",
        "data_start",
        "data_end",
        "identifier",
    ]
    .map(String::from)
    .to_vec();
    let mut rows = Vec::with_capacity(config.phrase_sets.len());
    for (idx, set) in config.phrase_sets.iter().enumerate() {
        let found = resolved.iter().find(|(title, _)| title.phrase_set == idx);
        let row = match found {
            Some((title, Some(bounds))) => vec![
                set.name.clone(),
                title.row.to_string(),
                bounds.header_row.to_string(),
                bounds.data_start.to_string(),
                bounds.data_end.to_string(),
                bounds.identifier_label.clone().unwrap_or_default(),
            ],
            Some((title, None)) => vec![
                set.name.clone(),
                title.row.to_string(),
                "-".into(),
                "-".into(),
                "-".into(),
                String::new(),
            ],
            None => vec![
                set.name.clone(),
                "-".into(),
                "-".into(),
                "-".into(),
                "-".into(),
                String::new(),
            ],
        };
        rows.push(row);
    }
    table::print_table(&headers, &rows);
    Ok(())
}

/// Merges the optional YAML config with command-line overrides.
pub fn load_config(args: &ExtractionArgs) -> Result<ExtractConfig> {
    let base = match &args.config {
        Some(path) => ExtractConfig::load(path)
            .with_context(|| format!("Loading configuration from {path:?}"))?,
        None => ExtractConfig::default(),
    };
    let mut config = base.with_phrases(&args.phrases);
    config.product_analysis |= args.product_analysis;
    config.auditor_mode |= args.auditor;
    config.validate()?;
    debug!(
        "Phrase sets: {:?}; product analysis: {}; auditor: {}",
        config
            .phrase_sets
            .iter()
            .map(|set| set.name.as_str())
            .collect::<Vec<_>>(),
        config.product_analysis,
        config.auditor_mode
    );
    Ok(config)
}

fn load_input(args: &GridInputArgs) -> Result<Grid> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    grid::load_grid(&args.input, args.delimiter, encoding)
        .with_context(|| format!("Loading grid from {:?}", args.input))
}

fn write_json<W: Write>(writer: &mut W, tables: &[ExtractedTable]) -> Result<()> {
    let reports = tables.iter().map(ExtractedTable::report).collect::<Vec<_>>();
    serde_json::to_writer_pretty(&mut *writer, &reports).context("Writing JSON output")?;
    writeln!(writer).context("Writing JSON output")?;
    Ok(())
}

/// One CSV block per table: a header record led by `table`, then one record
/// per row led by the table name.
fn write_csv<W: Write>(writer: &mut W, tables: &[ExtractedTable]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);
    for extracted in tables {
        let mut header = vec!["table".to_string()];
        header.extend(extracted.table.columns());
        csv_writer
            .write_record(&header)
            .context("Writing CSV header")?;
        for row in &extracted.table.rows {
            let mut record = vec![extracted.name.clone()];
            record.extend(row.iter().map(|cell| cell.text().into_owned()));
            csv_writer
                .write_record(&record)
                .context("Writing CSV row")?;
        }
    }
    csv_writer.flush().context("Flushing CSV output")?;
    Ok(())
}

fn write_text<W: Write>(writer: &mut W, tables: &[ExtractedTable]) -> Result<()> {
    for (idx, extracted) in tables.iter().enumerate() {
        if idx > 0 {
            writeln!(writer)?;
        }
        writeln!(
            writer,
            "{} (title row {}, header row {}, rows {}..{})",
            extracted.name,
            extracted.bounds.title_row,
            extracted.bounds.header_row,
            extracted.bounds.data_start,
            extracted.bounds.data_end
        )?;
        let rendered = table::render_cells(&extracted.table.columns(), &extracted.table.rows);
        write!(writer, "{rendered}")?;
    }
    Ok(())
}
