mod common;

use common::stacked_report_grid;
use report_grid::{
    cell::{Cell, CoercionPolicy, coerce},
    grid::Grid,
    materialize::materialize,
    schema::build,
};

#[test]
fn dash_in_a_numeric_column_becomes_zero() {
    let grid = stacked_report_grid();
    let schema = build(
        &["REGIONS", "Budget-Apr-24", "Act-Apr-24", "Gr.", "Ach."],
        false,
        false,
    );
    let table = materialize(&grid, 1, 3, 6, &schema).expect("table");
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.value("SOUTH", "Act-Apr-24"), Some(&Cell::Number(0.0)));
    assert_eq!(table.value("SOUTH", "Gr-Apr-24"), Some(&Cell::Number(0.0)));
    assert_eq!(
        table.value("NORTH", "Budget-Apr-24"),
        Some(&Cell::Number(1200.0))
    );
}

#[test]
fn identifier_column_is_never_numeric() {
    let grid = Grid::new(vec![
        vec![Cell::Text("REGIONS".into()), Cell::Text("Act-Apr-24".into())],
        vec![Cell::Number(101.0), Cell::Number(4.0)],
        vec![Cell::Text("  WEST   ZONE ".into()), Cell::Text("(2.5)".into())],
        vec![Cell::Text("null".into()), Cell::Text("12%".into())],
    ]);
    let schema = build(&["REGIONS", "Act-Apr-24"], false, false);
    let table = materialize(&grid, 0, 1, 4, &schema).expect("table");
    let labels = table
        .rows
        .iter()
        .map(|row| row[0].clone())
        .collect::<Vec<_>>();
    assert_eq!(
        labels,
        vec![
            Cell::Text("101".into()),
            Cell::Text("WEST ZONE".into()),
            Cell::Text(String::new()),
        ]
    );
    let values = table
        .rows
        .iter()
        .map(|row| row[1].as_number())
        .collect::<Vec<_>>();
    assert_eq!(values, vec![Some(4.0), Some(-2.5), Some(12.0)]);
}

#[test]
fn every_row_has_one_cell_per_column() {
    let grid = Grid::from_text_rows(vec![
        vec!["REGIONS", "Act-Apr-24", "Act-May-24"],
        vec!["NORTH"],
        vec!["SOUTH", "1", "2", "extra"],
    ]);
    let schema = build(&["REGIONS", "Act-Apr-24", "Act-May-24"], false, false);
    let table = materialize(&grid, 0, 1, 3, &schema).expect("table");
    assert!(table.rows.iter().all(|row| row.len() == 3));
    assert_eq!(table.rows[0][2], Cell::Number(0.0));
}

#[test]
fn empty_data_range_gives_an_empty_table() {
    let grid = Grid::from_text_rows(vec![vec!["REGIONS", "Act-Apr-24"]]);
    let schema = build(&["REGIONS", "Act-Apr-24"], false, false);
    let table = materialize(&grid, 0, 1, 1, &schema).expect("table");
    assert_eq!(table.row_count(), 0);
    assert_eq!(table.columns(), vec!["REGIONS", "Act-Apr-24"]);
}

#[test]
fn coercion_policies_differ_on_the_same_cell() {
    let raw = Cell::Text(" 1,234 ".into());
    assert_eq!(
        coerce(&raw, CoercionPolicy::AsNumeric),
        Cell::Number(1234.0)
    );
    assert_eq!(
        coerce(&raw, CoercionPolicy::AsIdentifier),
        Cell::Text("1,234".into())
    );
}
