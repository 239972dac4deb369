//! Statement readers. Each turns a file into header-keyed rows for the normalizer.

pub mod csv_rows;
