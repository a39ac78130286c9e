mod common;

use common::stacked_report_grid;
use report_grid::{
    boundary::{TableBounds, resolve},
    config::ExtractConfig,
    error::GridError,
    extract::resolve_all,
    grid::Grid,
    locate::{LocatedTitle, locate},
};

#[test]
fn stacked_tables_are_located_in_source_order() {
    let grid = stacked_report_grid();
    let located = locate(&grid, &ExtractConfig::default_phrase_sets());
    assert_eq!(
        located,
        vec![
            LocatedTitle { phrase_set: 0, row: 0 },
            LocatedTitle { phrase_set: 1, row: 6 },
        ]
    );
}

#[test]
fn stacked_tables_resolve_to_disjoint_ranges() {
    let grid = stacked_report_grid();
    let resolved = resolve_all(&grid, &ExtractConfig::default()).expect("valid rows");
    let bounds = resolved
        .into_iter()
        .map(|(_, bounds)| bounds.expect("both tables have headers"))
        .collect::<Vec<_>>();

    assert_eq!(
        bounds[0],
        TableBounds {
            title_row: 0,
            header_row: 1,
            data_start: 3,
            data_end: 6,
            identifier_label: Some("REGIONS".to_string()),
        }
    );
    assert_eq!(
        bounds[1],
        TableBounds {
            title_row: 6,
            header_row: 7,
            data_start: 10,
            data_end: 11,
            identifier_label: Some("REGIONS".to_string()),
        }
    );
    assert!(bounds[0].data_end <= bounds[1].title_row);
}

#[test]
fn sub_header_on_the_title_row_starts_data_below_it() {
    let grid = Grid::from_text_rows(vec![
        vec!["SALES IN MT", "Budget-Apr-24", "Act-Apr-24"],
        vec!["NORTH", "1", "2"],
    ]);
    let bounds = resolve(&grid, 0, None, false)
        .expect("valid rows")
        .expect("bounds");
    assert_eq!(bounds.header_row, 0);
    assert_eq!(bounds.data_start, 1);
    assert_eq!(bounds.identifier_label, None);
}

#[test]
fn identifier_row_below_the_sub_header_is_skipped() {
    let grid = Grid::from_text_rows(vec![
        vec!["SALES IN MT", "", ""],
        vec!["", "Budget-Apr-24", "Act-Apr-24"],
        vec!["REGIONS", "", ""],
        vec!["NORTH", "1", "2"],
    ]);
    let bounds = resolve(&grid, 0, None, false)
        .expect("valid rows")
        .expect("bounds");
    assert_eq!(bounds.header_row, 1);
    assert_eq!(bounds.data_start, 3);
    assert_eq!(bounds.identifier_label.as_deref(), Some("REGIONS"));
}

#[test]
fn identifier_scan_prefers_the_row_nearest_the_title() {
    let grid = Grid::from_text_rows(vec![
        vec!["SALES IN VALUE", "", ""],
        vec!["", "Apr-24 Budget", "Apr-24 Act"],
        vec!["", "Value", "Value"],
        vec!["REGIONS", "", ""],
        vec!["NORTH", "1", "2"],
    ]);
    let bounds = resolve(&grid, 0, None, false)
        .expect("valid rows")
        .expect("bounds");
    assert_eq!(bounds.header_row, 1);
    assert_eq!(bounds.data_start, 4);
}

#[test]
fn identifier_row_is_the_header_when_nothing_above_qualifies() {
    let grid = Grid::from_text_rows(vec![
        vec!["SALES IN MT", "", ""],
        vec!["PRODUCT NAME", "Apr-24", "May-24"],
        vec!["CEMENT", "1", "2"],
    ]);
    let bounds = resolve(&grid, 0, None, true)
        .expect("valid rows")
        .expect("bounds");
    // The title row is never a candidate, so the identifier row is the header.
    assert_eq!(bounds.header_row, 1);
    assert_eq!(bounds.data_start, 2);
    assert_eq!(bounds.identifier_label.as_deref(), Some("PRODUCT NAME"));
}

#[test]
fn title_row_is_not_a_header_candidate_for_the_identifier_scan() {
    let grid = Grid::from_text_rows(vec![
        vec!["", "SALES IN MT", ""],
        vec!["REGIONS", "Apr-24", "May-24"],
        vec!["NORTH", "1", "2"],
    ]);
    let bounds = resolve(&grid, 0, None, false)
        .expect("valid rows")
        .expect("bounds");
    assert_eq!(bounds.header_row, 1);
    assert_eq!(bounds.data_start, 2);
    assert_eq!(bounds.identifier_label.as_deref(), Some("REGIONS"));
}

#[test]
fn sentinel_row_below_a_sub_header_title_is_skipped() {
    for sentinel in ["ACCLLP", "accllp"] {
        let grid = Grid::from_text_rows(vec![
            vec!["SALES IN MT", "Budget-Apr-24", "Act-Apr-24"],
            vec![sentinel, "", ""],
            vec!["NORTH", "1", "2"],
        ]);
        let bounds = resolve(&grid, 0, None, false)
            .expect("valid rows")
            .expect("bounds");
        assert_eq!(bounds.header_row, 0, "sentinel {sentinel}");
        assert_eq!(bounds.data_start, 2, "sentinel {sentinel}");
    }
}

#[test]
fn em_dash_sub_headers_are_sniffed() {
    let grid = Grid::from_text_rows(vec![
        vec!["SALES IN MT", "Budget\u{2014}Apr-24", "Act\u{2014}Apr-24"],
        vec!["NORTH", "1", "2"],
    ]);
    let bounds = resolve(&grid, 0, None, false)
        .expect("valid rows")
        .expect("bounds");
    assert_eq!(bounds.header_row, 0);
    assert_eq!(bounds.data_start, 1);
}

#[test]
fn table_without_a_recognisable_header_is_absent() {
    let grid = Grid::from_text_rows(vec![
        vec!["SALES IN MT"],
        vec!["nothing"],
        vec!["to see"],
    ]);
    assert_eq!(resolve(&grid, 0, None, false), Ok(None));
}

#[test]
fn next_title_above_the_current_one_is_rejected() {
    let grid = Grid::from_text_rows(vec![vec!["SALES IN MT"], vec!["x"], vec!["y"]]);
    assert_eq!(
        resolve(&grid, 2, Some(1), false),
        Err(GridError::InvertedRange { start: 2, end: 1 })
    );
}
