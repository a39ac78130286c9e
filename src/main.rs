fn main() {
    if let Err(err) = report_grid::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
