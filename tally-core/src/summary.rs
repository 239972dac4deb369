//! Aggregated views over a transaction set.
//!
//! These are value objects: they are rebuilt from scratch on every ingestion
//! and consumers only read them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::finance::{Category, Transaction};

/// Income and expenses for one calendar month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlySummary {
    /// Grouping key, `YYYY-MM`
    pub key: String,
    /// Display label, e.g. `Jan 24`
    pub label: String,
    /// Sum of positive amounts
    pub income: f64,
    /// Sum of absolute negative amounts
    pub expenses: f64,
    /// `income - expenses`
    pub savings: f64,
    /// `savings / income * 100`, or 0 when there is no income
    pub savings_rate: f64,
}

/// Spend for one category (expenses only)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySummary {
    pub category: Category,
    pub spent: f64,
    pub transaction_count: usize,
    /// Ceiling used for over/under budget checks
    pub budget: f64,
    pub percentage_of_total_spend: f64,
}

impl CategorySummary {
    pub fn is_over_budget(&self) -> bool {
        self.spent > self.budget
    }

    pub fn is_under_budget(&self) -> bool {
        self.spent < self.budget
    }
}

/// Expense total for one calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySummary {
    pub day: NaiveDate,
    pub spending: f64,
}

/// Everything the presentation layer reads after an ingestion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    /// Ascending by calendar month
    pub monthly: Vec<MonthlySummary>,
    /// In first-seen order
    pub categories: Vec<CategorySummary>,
    /// Ascending by date, trailing window only
    pub daily: Vec<DailySummary>,
    pub transactions: Vec<Transaction>,
}

impl Summary {
    pub fn total_transactions(&self) -> usize {
        self.transactions.len()
    }

    pub fn total_spend(&self) -> f64 {
        self.categories.iter().map(|c| c.spent).sum()
    }

    pub fn category(&self, category: Category) -> Option<&CategorySummary> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn month(&self, key: &str) -> Option<&MonthlySummary> {
        self.monthly.iter().find(|m| m.key == key)
    }
}
