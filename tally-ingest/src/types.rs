use std::collections::HashMap;

use tally_core::Transaction;

/// One CSV data row keyed by its (trimmed) header.
pub type RawRow = HashMap<String, String>;

/// Header aliases tried in order for each canonical field.
pub const DATE_HEADERS: &[&str] = &["Date", "date", "Transaction Date", "Posting Date", "Post Date"];
pub const DESCRIPTION_HEADERS: &[&str] = &["Description", "description", "Reference", "Narration", "Memo"];
pub const AMOUNT_HEADERS: &[&str] = &["Amount", "amount"];
pub const DEBIT_HEADER: &str = "Debit";
pub const CREDIT_HEADER: &str = "Credit";

/// Output of normalizing a batch of rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub transactions: Vec<Transaction>,
    /// Rows dropped as malformed
    pub rejected: usize,
}
