//! Point source fixtures written to temporary directories.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;

/// Header used by the address CSV fixtures.
pub const CSV_HEADER: &str = "NUMBER,STREET,LON,LAT";

/// Five rows: two with non-numeric LON and one with an out-of-range LAT.
pub const MIXED_QUALITY_ROWS: &[&str] = &[
    "12,Main St,-122.2711,37.8044",
    "14,Main St,n/a,37.8050",
    "16,Main St,,37.8055",
    "18,Main St,-122.2700,95.0",
    "20,Main St,-122.2690,37.8060",
];

/// Four addresses around downtown Oakland.
pub const OAKLAND_ROWS: &[&str] = &[
    "1,Broadway,-122.2750,37.8000",
    "2,Broadway,-122.2650,37.8000",
    "3,Broadway,-122.2750,37.8100",
    "4,Broadway,-122.2650,37.8100",
];

/// Join a header and rows into CSV text.
pub fn csv_text(header: &str, rows: &[&str]) -> String {
    let mut text = String::from(header);
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

/// Write a CSV file into `dir`.
pub fn write_csv(dir: &Path, name: &str, header: &str, rows: &[&str]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, csv_text(header, rows)).expect("write csv fixture");
    path
}

/// Write a zip archive into `dir` with the given `(entry name, contents)` pairs
/// in order.
pub fn write_zip(dir: &Path, name: &str, entries: &[(&str, String)]) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).expect("create zip fixture");
    let mut zip = zip::ZipWriter::new(file);

    for (entry, contents) in entries {
        zip.start_file(*entry, SimpleFileOptions::default())
            .expect("start zip entry");
        zip.write_all(contents.as_bytes()).expect("write zip entry");
    }
    zip.finish().expect("finish zip fixture");
    path
}
