//! CSV and zipped-CSV point readers.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use preview_common::{GeoPoint, PreviewError, PreviewResult};
use tracing::debug;

/// Longitude column header.
pub const LON_COLUMN: &str = "LON";

/// Latitude column header.
pub const LAT_COLUMN: &str = "LAT";

/// Supported point source containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Plain CSV file
    Csv,
    /// Zip archive holding at least one `.csv` entry
    Zip,
}

/// Detect the source format from the file suffix (case-insensitive).
pub fn detect_format(path: &Path) -> PreviewResult<SourceFormat> {
    let suffix = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match suffix.as_deref() {
        Some("csv") => Ok(SourceFormat::Csv),
        Some("zip") => Ok(SourceFormat::Zip),
        _ => Err(PreviewError::FormatError(format!(
            "Expected a .csv or .zip file: {}",
            path.display()
        ))),
    }
}

/// Points read from a source, with row accounting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub points: Vec<GeoPoint>,
    /// Data rows seen (header excluded)
    pub rows: usize,
    /// Rows dropped for unparsable or out-of-range coordinates
    pub skipped: usize,
}

/// Read points from a `.csv` file or the first `.csv` entry of a `.zip`.
pub fn read_points(path: &Path) -> PreviewResult<IngestReport> {
    let format = detect_format(path)?;
    let file = File::open(path)
        .map_err(|e| PreviewError::FetchError(format!("{}: {}", path.display(), e)))?;

    let report = match format {
        SourceFormat::Csv => read_csv_points(BufReader::new(file))?,
        SourceFormat::Zip => {
            let mut archive = zip::ZipArchive::new(BufReader::new(file))
                .map_err(|e| PreviewError::FormatError(format!("Bad zip archive: {}", e)))?;
            let name = first_csv_entry(&archive).ok_or_else(|| {
                PreviewError::FormatError(format!("No .csv entry in {}", path.display()))
            })?;
            debug!(entry = %name, "Reading points from archive entry");

            let entry = archive
                .by_name(&name)
                .map_err(|e| PreviewError::FormatError(format!("{}: {}", name, e)))?;
            read_csv_points(entry)?
        }
    };

    debug!(
        rows = report.rows,
        points = report.points.len(),
        skipped = report.skipped,
        "Read source points"
    );
    Ok(report)
}

/// Name of the first archive entry ending in `.csv`, in archive order.
fn first_csv_entry<R: Read + std::io::Seek>(archive: &zip::ZipArchive<R>) -> Option<String> {
    archive
        .file_names()
        .find(|name| name.ends_with(".csv"))
        .map(str::to_string)
}

/// Read `LON`/`LAT` pairs from CSV data with a header row.
///
/// Rows whose coordinates do not parse as numbers, are missing, or fall
/// outside ±180/±90 degrees are counted and skipped. A header without both
/// columns, or an I/O failure mid-read, is an error.
pub fn read_csv_points<R: Read>(reader: R) -> PreviewResult<IngestReport> {
    let mut csv = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = csv.byte_headers().map_err(csv_error)?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name.as_bytes())
            .ok_or_else(|| PreviewError::FormatError(format!("Missing {} column", name)))
    };
    let lon_idx = column(LON_COLUMN)?;
    let lat_idx = column(LAT_COLUMN)?;

    let mut report = IngestReport::default();
    let mut record = csv::ByteRecord::new();

    loop {
        match csv.read_byte_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(csv_error(e)),
            Err(_) => {
                report.rows += 1;
                report.skipped += 1;
                continue;
            }
        }
        report.rows += 1;

        match parse_point(record.get(lon_idx), record.get(lat_idx)) {
            Some(point) => report.points.push(point),
            None => report.skipped += 1,
        }
    }

    Ok(report)
}

fn parse_coordinate(field: Option<&[u8]>) -> Option<f64> {
    std::str::from_utf8(field?).ok()?.trim().parse().ok()
}

fn parse_point(lon: Option<&[u8]>, lat: Option<&[u8]>) -> Option<GeoPoint> {
    let point = GeoPoint::new(parse_coordinate(lon)?, parse_coordinate(lat)?);
    point.is_valid().then_some(point)
}

fn csv_error(err: csv::Error) -> PreviewError {
    match err.kind() {
        csv::ErrorKind::Io(e) => PreviewError::FetchError(format!("CSV read failed: {}", e)),
        _ => PreviewError::FormatError(format!("CSV error: {}", err)),
    }
}
