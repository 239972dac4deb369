//! tally-ingest: statement ingestion (CSV rows, header aliases) and the record normalizer.

pub mod error;
pub mod normalizer;
pub mod parsers;
pub mod template;
pub mod types;

pub use error::{IngestError, Rejection, Result};
pub use normalizer::{normalize, normalize_rows};
pub use parsers::csv_rows::{ensure_csv, read_rows, read_rows_from_path};
pub use types::{Normalized, RawRow};
