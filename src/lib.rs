pub mod boundary;
pub mod cell;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod fuzzy;
pub mod grid;
pub mod io_utils;
pub mod locate;
pub mod materialize;
pub mod phrase;
pub mod preview;
pub mod schema;
pub mod table;
pub mod token;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("report_grid", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => extract::execute(&args),
        Commands::Locate(args) => extract::execute_locate(&args),
        Commands::Classify(args) => handle_classify(&args),
        Commands::Suggest(args) => handle_suggest(&args),
        Commands::Preview(args) => preview::execute(&args),
    }
}

fn handle_classify(args: &cli::ClassifyArgs) -> Result<()> {
    debug!("Classifying {} header cell(s)", args.headers.len());
    let schema = schema::build(&args.headers, args.product_analysis, false);
    let headers = ["raw", "canonical", "metric", "period"]
        .map(String::from)
        .to_vec();
    let rows = schema
        .columns
        .iter()
        .map(|column| {
            let token = &column.token;
            let metric = if token.is_identifier_column {
                "identifier".to_string()
            } else {
                token.metric_kind.to_string()
            };
            vec![
                token.raw_text.clone(),
                column.canonical_name.clone(),
                metric,
                token
                    .period
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);

    if let Some(path) = &args.schema_out {
        schema
            .save(path)
            .with_context(|| format!("Writing schema to {path:?}"))?;
        info!("Schema for {} column(s) written to {:?}", schema.len(), path);
    }
    Ok(())
}

fn handle_suggest(args: &cli::SuggestArgs) -> Result<()> {
    let catalogue = match &args.catalogue {
        Some(path) => config::load_role_catalogue(path)
            .with_context(|| format!("Loading role catalogue from {path:?}"))?,
        None => fuzzy::standard_catalogue(),
    };
    debug!("Scoring against {} role(s)", catalogue.len());
    let headers = ["column", "role", "score"].map(String::from).to_vec();
    let rows = fuzzy::suggest_mappings(&args.columns, &catalogue)
        .into_iter()
        .map(|(column, suggestion)| match suggestion {
            Some(found) => vec![column, found.role, format!("{:.2}", found.score)],
            None => vec![column, "-".to_string(), "0.00".to_string()],
        })
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
    Ok(())
}
