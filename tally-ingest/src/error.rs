//! Error types for statement ingestion

use thiserror::Error;

/// File-level failures. Nothing is normalized when one of these occurs.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Unsupported file type: {0} (expected a .csv file)")]
    UnsupportedFileType(String),

    #[error("CSV parsing error: {0}")]
    ParseFailure(#[from] csv::Error),

    #[error("CSV write error: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestError {
    /// Short message suitable for showing to the person who uploaded the file
    pub fn user_message(&self) -> &'static str {
        match self {
            IngestError::UnsupportedFileType(_) => "Please upload a CSV file",
            IngestError::ParseFailure(_) => "Failed to parse CSV file",
            IngestError::Write(_) => "Could not write the CSV file",
            IngestError::Io(_) => "Could not read the uploaded file",
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;

/// Why a single row was dropped during normalization.
///
/// Rejections are recovered locally: the row is excluded and the rest of
/// the file carries on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("no date column")]
    MissingDate,

    #[error("unparseable date: {0}")]
    InvalidDate(String),

    #[error("empty description")]
    EmptyDescription,

    #[error("no amount column")]
    MissingAmount,

    #[error("unparseable amount: {0}")]
    InvalidAmount(String),

    #[error("amount below threshold: {0}")]
    NegligibleAmount(f64),
}
