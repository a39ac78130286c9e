#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use encoding_rs::UTF_8;
use report_grid::{
    grid::{Grid, read_delimited_grid},
    io_utils,
};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// Two stacked tables as a monthly sales export lays them out. The first has
/// its sub-header right under the title and a `TOTAL SALES` row before the
/// data; the second has a units row and a separate `REGIONS` row below its
/// header.
pub const STACKED_REPORT_CSV: &str = "\
SALES IN MT,,,,
REGIONS,Budget-Apr-24,Act-Apr-24,Gr.,Ach.
TOTAL SALES,,,,
NORTH,\"1,200\",1100,-8.3,91.7
SOUTH,800,-,nan,0
,,,,
SALES IN VALUE,,,,
,Apr-24 Budget,Apr-24 Act,Gr,Ach
,RS,RS,RS,RS
REGIONS,,,,
NORTH,5000,5500,10,110
";

pub fn stacked_report_grid() -> Grid {
    let reader = io_utils::open_grid_reader(STACKED_REPORT_CSV.as_bytes(), b',');
    read_delimited_grid(reader, UTF_8).expect("fixture grid parses")
}
