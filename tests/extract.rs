mod common;

use common::{STACKED_REPORT_CSV, TestWorkspace, stacked_report_grid};
use encoding_rs::UTF_8;
use report_grid::{
    cell::Cell,
    config::ExtractConfig,
    extract::extract_tables,
    grid::{Grid, load_grid},
    phrase::PhraseSet,
};

#[test]
fn stacked_report_extracts_both_tables() {
    let tables = extract_tables(&stacked_report_grid(), &ExtractConfig::default()).expect("extract");
    assert_eq!(tables.len(), 2);

    let mt = &tables[0];
    assert_eq!(mt.name, "mt");
    assert_eq!(
        mt.table.columns(),
        vec!["REGIONS", "Budget-Apr-24", "Act-Apr-24", "Gr-Apr-24", "Ach-Apr-24"]
    );
    assert_eq!(mt.table.row_count(), 2);

    let value = &tables[1];
    assert_eq!(value.name, "value");
    assert_eq!(
        value.table.columns(),
        vec!["REGIONS", "Budget-Apr-24", "Act-Apr-24", "Gr-Apr-24", "Ach-Apr-24"]
    );
    assert_eq!(
        value.table.rows,
        vec![vec![
            Cell::Text("NORTH".into()),
            Cell::Number(5000.0),
            Cell::Number(5500.0),
            Cell::Number(10.0),
            Cell::Number(110.0),
        ]]
    );
}

#[test]
fn csv_and_json_grids_extract_identically() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("report.csv", STACKED_REPORT_CSV);
    let from_csv = load_grid(&csv_path, None, UTF_8).expect("csv grid");

    let json = serde_json::to_string(&from_csv).expect("serialize grid");
    let json_path = workspace.write("report.json", &json);
    let from_json = load_grid(&json_path, None, UTF_8).expect("json grid");

    let config = ExtractConfig::default();
    assert_eq!(
        extract_tables(&from_csv, &config).expect("csv tables"),
        extract_tables(&from_json, &config).expect("json tables")
    );
}

#[test]
fn missing_titles_yield_fewer_tables() {
    let grid = Grid::from_text_rows(vec![
        vec!["SALES IN QTY", "", ""],
        vec!["REGIONS", "Budget-Apr-24", "Act-Apr-24"],
        vec!["EAST", "3", "4"],
    ]);
    let tables = extract_tables(&grid, &ExtractConfig::default()).expect("extract");
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].name, "mt");
}

#[test]
fn product_analysis_uses_product_identifier_rows() {
    let grid = Grid::from_text_rows(vec![
        vec!["SALES IN MT", "", ""],
        vec!["", "Act-Apr-24", "Gr."],
        vec!["PRODUCT", "", ""],
        vec!["CEMENT", "10", "4"],
        vec!["TOTAL", "10", "4"],
    ]);
    let config = ExtractConfig {
        product_analysis: true,
        ..ExtractConfig::default()
    };
    let tables = extract_tables(&grid, &config).expect("extract");
    assert_eq!(tables.len(), 1);
    let table = &tables[0].table;
    assert_eq!(table.columns(), vec!["PRODUCT", "Act-Apr-24", "Gr-Apr-24"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.value("TOTAL", "Gr-Apr-24"), Some(&Cell::Number(4.0)));
}

#[test]
fn title_in_a_later_column_keeps_the_identifier_row_as_header() {
    let grid = Grid::from_text_rows(vec![
        vec!["", "SALES IN MT", ""],
        vec!["REGIONS", "Apr-24", "May-24"],
        vec!["NORTH", "1", "2"],
    ]);
    let tables = extract_tables(&grid, &ExtractConfig::default()).expect("extract");
    assert_eq!(tables.len(), 1);
    let table = &tables[0].table;
    assert_eq!(table.columns(), vec!["REGIONS", "Act-Apr-24", "Act-May-24"]);
    assert_eq!(table.value("NORTH", "Act-May-24"), Some(&Cell::Number(2.0)));
}

#[test]
fn custom_phrase_sets_locate_other_reports() {
    let grid = Grid::from_text_rows(vec![
        vec!["STOCK POSITION", "", ""],
        vec!["BRANCH", "Act-Mar-25", "LY-Mar-24"],
        vec!["PUNE", "7", "6"],
    ]);
    let config = ExtractConfig {
        phrase_sets: vec![PhraseSet::new("stock", ["stock position"])],
        ..ExtractConfig::default()
    };
    let tables = extract_tables(&grid, &config).expect("extract");
    assert_eq!(tables.len(), 1);
    assert_eq!(
        tables[0].table.columns(),
        vec!["BRANCH", "Act-Mar-25", "LY-Mar-24"]
    );
}
