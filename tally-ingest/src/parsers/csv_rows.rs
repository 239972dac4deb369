//! Header-keyed CSV reader.
//!
//! Any bank export with a header row works: each data row becomes a map of
//! header → cell, and header aliasing is left to the normalizer.

use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::types::RawRow;

const BOM: char = '\u{feff}';

/// Reject anything that is not a `.csv` file before touching its contents.
pub fn ensure_csv(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        Ok(())
    } else {
        Err(IngestError::UnsupportedFileType(path.display().to_string()))
    }
}

/// Parse CSV text with a header row into rows.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches(BOM).trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        rows.push(record_to_row(&headers, &record));
    }

    debug!("Read {} CSV rows ({} columns)", rows.len(), headers.len());
    Ok(rows)
}

/// Check the extension, open the file, and read its rows.
pub fn read_rows_from_path(path: impl AsRef<Path>) -> Result<Vec<RawRow>> {
    let path = path.as_ref();
    ensure_csv(path)?;
    let file = File::open(path)?;
    read_rows(file)
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|f| f.is_empty())
}

fn record_to_row(headers: &[String], record: &StringRecord) -> RawRow {
    headers
        .iter()
        .zip(record.iter())
        .filter(|(h, _)| !h.is_empty())
        .map(|(h, v)| (h.clone(), v.to_string()))
        .collect()
}
