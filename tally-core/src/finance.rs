//! Transaction record types shared by ingestion and analytics

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Amounts whose absolute value falls below this are treated as noise.
pub const MIN_AMOUNT: f64 = 0.01;

/// A normalized bank transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Calendar date of the transaction (serialized as YYYY-MM-DD)
    pub date: NaiveDate,
    /// Trimmed, non-empty description
    pub description: String,
    /// Positive = inflow, negative = outflow
    pub amount: f64,
    /// Classifier-assigned category
    pub category: Category,
    /// Derived from the sign of `amount`
    #[serde(rename = "type")]
    pub txn_type: TxnType,
}

/// Spending domains a transaction can be classified into.
///
/// Declaration order is significant: the classifier walks the spending
/// categories in this order and the first keyword hit wins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "Food & Groceries")]
    FoodAndGroceries,
    #[serde(rename = "Transportation")]
    Transportation,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Utilities & Services")]
    UtilitiesAndServices,
    #[serde(rename = "Healthcare")]
    Healthcare,
    #[serde(rename = "Banking & Finance")]
    BankingAndFinance,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Income")]
    Income,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 10] = [
        Category::FoodAndGroceries,
        Category::Transportation,
        Category::Shopping,
        Category::Entertainment,
        Category::UtilitiesAndServices,
        Category::Healthcare,
        Category::BankingAndFinance,
        Category::Education,
        Category::Income,
        Category::Other,
    ];

    /// Categories that carry keyword rules (everything except Income and Other).
    pub const SPENDING: [Category; 8] = [
        Category::FoodAndGroceries,
        Category::Transportation,
        Category::Shopping,
        Category::Entertainment,
        Category::UtilitiesAndServices,
        Category::Healthcare,
        Category::BankingAndFinance,
        Category::Education,
    ];

    /// Display name, also used as the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FoodAndGroceries => "Food & Groceries",
            Category::Transportation => "Transportation",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::UtilitiesAndServices => "Utilities & Services",
            Category::Healthcare => "Healthcare",
            Category::BankingAndFinance => "Banking & Finance",
            Category::Education => "Education",
            Category::Income => "Income",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Case-insensitive match on the display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// Credit/debit tag, redundant with the amount sign but kept for display
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TxnType {
    #[serde(rename = "credit")]
    Credit,
    #[serde(rename = "debit")]
    Debit,
}

impl TxnType {
    pub fn from_amount(amount: f64) -> Self {
        if amount > 0.0 {
            TxnType::Credit
        } else {
            TxnType::Debit
        }
    }
}

impl Transaction {
    /// Create a new Transaction; the type tag is derived from the amount.
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        category: Category,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            category,
            txn_type: TxnType::from_amount(amount),
        }
    }

    /// Returns true if this is an expense (negative amount)
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    /// Returns true if this is income (positive amount)
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    /// Get the absolute amount
    pub fn abs_amount(&self) -> f64 {
        self.amount.abs()
    }

    /// Canonical ISO date string (YYYY-MM-DD)
    pub fn iso_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
