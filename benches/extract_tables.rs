use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use report_grid::{
    cell::Cell,
    classify::ClassificationRuleSet,
    config::ExtractConfig,
    extract::extract_tables,
    grid::Grid,
    schema,
};

const MONTHS: [&str; 12] = [
    "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec", "Jan", "Feb", "Mar",
];

fn header_row(title: &str) -> (Vec<Cell>, Vec<Cell>) {
    let mut title_row = vec![Cell::Text(title.to_string())];
    let mut header = vec![Cell::Text("REGIONS".to_string())];
    for month in MONTHS {
        for metric in ["Budget", "Act"] {
            header.push(Cell::Text(format!("{metric}-{month}-24")));
        }
        header.push(Cell::Text("Gr.".to_string()));
        header.push(Cell::Text("Ach.".to_string()));
    }
    title_row.resize(header.len(), Cell::Empty);
    (title_row, header)
}

fn stacked_report(regions: usize) -> Grid {
    let mut rows = Vec::new();
    for title in ["SALES IN MT", "SALES IN VALUE"] {
        let (title_row, header) = header_row(title);
        let width = header.len();
        rows.push(title_row);
        rows.push(header);
        for region in 0..regions {
            let mut row = vec![Cell::Text(format!("REGION {region}"))];
            row.extend((1..width).map(|col| match (region + col) % 17 {
                0 => Cell::Text("-".to_string()),
                1 => Cell::Text(format!("{},{:03}", col, region % 1000)),
                n => Cell::Number((n * col) as f64 / 3.0),
            }));
            rows.push(row);
        }
        rows.push(Vec::new());
    }
    Grid::new(rows)
}

fn bench_extract(c: &mut Criterion) {
    let grid = stacked_report(500);
    let config = ExtractConfig::default();
    let (_, header) = header_row("SALES IN MT");
    let header = header
        .iter()
        .map(|cell| cell.text().into_owned())
        .collect::<Vec<_>>();
    let rules = ClassificationRuleSet::standard();

    let mut group = c.benchmark_group("extract");
    group.bench_function("two_stacked_tables", |b| {
        b.iter(|| extract_tables(black_box(&grid), &config).expect("extract"))
    });
    group.bench_function("build_schema", |b| {
        b.iter(|| schema::build_with_rules(&rules, black_box(&header), false, false))
    });
    group.bench_function("compile_rules", |b| b.iter(ClassificationRuleSet::standard));
    group.finish();
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
