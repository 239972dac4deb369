//! End-to-end pipeline: rows → normalizer → aggregation → insights.
//!
//! A run completes fully before anything is exposed. [`AnalysisSlot`] holds
//! the latest result and swaps it whole, so a reader never sees a mix of
//! two ingestions.

use serde::Serialize;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use tally_core::{Summary, Transaction};
use tally_ingest::{RawRow, normalize_rows, read_rows, read_rows_from_path};

use crate::aggregate::{AggregateOptions, Aggregator};
use crate::insights::{Benchmarks, Insights, derive_insights};

/// Summary plus the insights derived from it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub summary: Summary,
    pub insights: Insights,
}

/// Result of one ingestion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Rows dropped as malformed
    pub rejected_rows: usize,
    /// `None` when no valid transaction survived
    pub report: Option<Report>,
}

impl Analysis {
    pub fn is_empty(&self) -> bool {
        self.report.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    aggregator: Aggregator,
    benchmarks: Benchmarks,
}

impl Pipeline {
    pub fn new(options: AggregateOptions, benchmarks: Benchmarks) -> Self {
        Self {
            aggregator: Aggregator::new(options),
            benchmarks,
        }
    }

    /// Run over rows already read from a CSV with headers.
    pub fn run(&self, rows: &[RawRow]) -> Analysis {
        let normalized = normalize_rows(rows);
        self.analyze(&normalized.transactions, normalized.rejected)
    }

    /// Run over transactions that need no normalization (e.g. sample data).
    pub fn run_transactions(&self, txns: &[Transaction]) -> Analysis {
        self.analyze(txns, 0)
    }

    pub fn run_reader<R: Read>(&self, reader: R) -> tally_ingest::Result<Analysis> {
        let rows = read_rows(reader)?;
        Ok(self.run(&rows))
    }

    /// Check the file type, parse, and run.
    pub fn run_csv(&self, path: impl AsRef<Path>) -> tally_ingest::Result<Analysis> {
        let rows = read_rows_from_path(path)?;
        Ok(self.run(&rows))
    }

    fn analyze(&self, txns: &[Transaction], rejected_rows: usize) -> Analysis {
        let report = self.aggregator.aggregate(txns).map(|summary| {
            let insights = derive_insights(&summary, &self.benchmarks);
            Report { summary, insights }
        });

        info!(
            "Analysis complete: {} transactions, {} rejected rows",
            txns.len(),
            rejected_rows
        );
        Analysis {
            rejected_rows,
            report,
        }
    }
}

/// Holds the most recent analysis. Replacing it never disturbs readers that
/// still hold the previous one.
#[derive(Debug, Default)]
pub struct AnalysisSlot {
    current: Option<Arc<Analysis>>,
}

impl AnalysisSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<Analysis>> {
        self.current.clone()
    }

    /// Swap in a new analysis, returning the previous one.
    pub fn replace(&mut self, analysis: Analysis) -> Option<Arc<Analysis>> {
        self.current.replace(Arc::new(analysis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::Category;
    use tally_ingest::IngestError;

    const STATEMENT: &str = "\
Date,Description,Amount
2024-01-15,Pick n Pay Groceries,-450.00
2024-01-15,Salary,28000.00
2024-01-16,Mystery,abc
";

    #[test]
    fn test_run_reader_end_to_end() {
        let analysis = Pipeline::default().run_reader(STATEMENT.as_bytes()).unwrap();
        assert_eq!(analysis.rejected_rows, 1);

        let report = analysis.report.unwrap();
        let jan = &report.summary.monthly[0];
        assert_eq!(jan.income, 28000.0);
        assert_eq!(jan.expenses, 450.0);
        assert_eq!(jan.savings, 27550.0);
        assert_eq!(report.summary.categories.len(), 1);
        assert_eq!(report.summary.categories[0].category, Category::FoodAndGroceries);
        assert_eq!(report.summary.total_transactions(), 2);
        assert_eq!(
            report.insights.top_category.unwrap().category,
            Category::FoodAndGroceries
        );
    }

    #[test]
    fn test_all_rows_rejected_is_empty_not_error() {
        let text = "Date,Description,Amount\nbad,Spar,-1\n2024-01-01,,-5\n";
        let analysis = Pipeline::default().run_reader(text.as_bytes()).unwrap();
        assert!(analysis.is_empty());
        assert_eq!(analysis.rejected_rows, 2);
    }

    #[test]
    fn test_run_csv_rejects_other_file_types() {
        let err = Pipeline::default().run_csv("statement.pdf").unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFileType(_)));
    }

    #[test]
    fn test_analysis_json_shape() {
        let analysis = Pipeline::default().run_reader(STATEMENT.as_bytes()).unwrap();
        let value = serde_json::to_value(&analysis).unwrap();

        assert_eq!(value["rejected_rows"], 1);
        let summary = &value["report"]["summary"];
        assert_eq!(summary["monthly"][0]["key"], "2024-01");
        assert_eq!(summary["categories"][0]["category"], "Food & Groceries");
        assert_eq!(summary["transactions"][0]["type"], "debit");
        assert_eq!(summary["transactions"][0]["date"], "2024-01-15");
        assert_eq!(
            value["report"]["insights"]["findings"][0]["kind"],
            "excellent_savings_rate"
        );
    }

    #[test]
    fn test_slot_replaces_whole_analysis() {
        let pipeline = Pipeline::default();
        let mut slot = AnalysisSlot::new();
        assert!(slot.current().is_none());

        slot.replace(pipeline.run_reader(STATEMENT.as_bytes()).unwrap());
        let held = slot.current().unwrap();

        let previous = slot.replace(pipeline.run(&[]));
        assert!(Arc::ptr_eq(&previous.unwrap(), &held));
        // the old reader still sees the first ingestion
        assert!(!held.is_empty());
        assert!(slot.current().unwrap().is_empty());
    }
}
