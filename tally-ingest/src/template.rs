//! Downloadable CSV template and CSV export of normalized transactions.
//!
//! Column contract: `Date,Description,Amount,Category`, UTF-8, ISO or
//! `DD/MM/YYYY` dates, signed amounts (negative = money out).

use std::io::Write;

use tally_core::Transaction;

use crate::error::{IngestError, Result};

pub const TEMPLATE_FILE_NAME: &str = "personal_finance_template.csv";

pub const TEMPLATE_HEADERS: [&str; 4] = ["Date", "Description", "Amount", "Category"];

pub const CSV_TEMPLATE: &str = "\
Date,Description,Amount,Category
2024-01-15,Pick n Pay Groceries,-450.00,Food & Groceries
2024-01-15,Shell Petrol,-850.00,Transportation
2024-01-15,Salary,28000.00,Income
16/01/2024,DStv Payment,-799.00,Entertainment
16/01/2024,Eskom Electricity,-1200.00,Utilities & Services
";

/// Write transactions in template shape, so the output can be re-imported.
pub fn write_transactions_csv<W: Write>(writer: W, txns: &[Transaction]) -> Result<()> {
    let write_err = |e: csv::Error| IngestError::Write(e.to_string());

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(TEMPLATE_HEADERS).map_err(write_err)?;
    for t in txns {
        wtr.write_record([
            t.iso_date(),
            t.description.clone(),
            format!("{:.2}", t.amount),
            t.category.as_str().to_string(),
        ])
        .map_err(write_err)?;
    }
    wtr.flush()
        .map_err(|e| IngestError::Write(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize_rows;
    use crate::parsers::csv_rows::read_rows;
    use chrono::NaiveDate;
    use tally_core::Category;

    #[test]
    fn test_template_is_accepted_by_normalizer() {
        let rows = read_rows(CSV_TEMPLATE.as_bytes()).unwrap();
        let out = normalize_rows(&rows);
        assert_eq!(out.rejected, 0);
        assert_eq!(out.transactions.len(), 5);
        assert_eq!(out.transactions[2].category, Category::Income);
        assert_eq!(
            out.transactions[4].date,
            NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()
        );
    }

    #[test]
    fn test_export_reimports() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let txns = vec![
            Transaction::new(d, "Mr Price, Menlyn", -349.99, Category::Shopping),
            Transaction::new(d, "Salary Deposit", 31000.0, Category::Income),
        ];
        let mut buf = Vec::new();
        write_transactions_csv(&mut buf, &txns).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Date,Description,Amount,Category\n"));
        assert!(text.contains("\"Mr Price, Menlyn\""));

        let out = normalize_rows(&read_rows(text.as_bytes()).unwrap());
        assert_eq!(out.transactions.len(), 2);
        assert_eq!(out.transactions[0].amount, -349.99);
        assert_eq!(out.transactions[1].category, Category::Income);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_export_is_a_write_error() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let txns = vec![Transaction::new(d, "Spar", -20.0, Category::FoodAndGroceries)];

        let err = write_transactions_csv(BrokenPipe, &txns).unwrap_err();
        assert!(matches!(err, IngestError::Write(_)));
        assert_eq!(err.user_message(), "Could not write the CSV file");
    }
}
