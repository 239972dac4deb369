//! Aggregation engine: groups normalized transactions into monthly, category
//! and daily summaries.
//!
//! Sums are accumulated per group first and derived metrics (savings,
//! savings rate, percentages, budgets) are computed once at the end, so the
//! result does not depend on input order except for the documented output
//! orderings.

use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use tally_core::{Category, CategorySummary, DailySummary, MonthlySummary, Summary, Transaction};

pub const DEFAULT_DAILY_WINDOW: usize = 30;
pub const DEFAULT_BUDGET_HEADROOM: f64 = 1.1;

/// How a category's budget is chosen
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetPolicy {
    /// Multiplier applied to observed spend when no explicit budget exists
    pub headroom: f64,
    /// Explicit per-category budgets
    pub explicit: HashMap<Category, f64>,
}

impl Default for BudgetPolicy {
    fn default() -> Self {
        Self {
            headroom: DEFAULT_BUDGET_HEADROOM,
            explicit: HashMap::new(),
        }
    }
}

impl BudgetPolicy {
    pub fn with_budget(mut self, category: Category, amount: f64) -> Self {
        self.explicit.insert(category, amount);
        self
    }

    pub fn budget_for(&self, category: Category, spent: f64) -> f64 {
        self.explicit
            .get(&category)
            .copied()
            .unwrap_or(spent * self.headroom)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOptions {
    pub budgets: BudgetPolicy,
    /// Number of most recent expense days kept in the daily series
    pub daily_window: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            budgets: BudgetPolicy::default(),
            daily_window: DEFAULT_DAILY_WINDOW,
        }
    }
}

#[derive(Default)]
struct MonthTotals {
    income: f64,
    expenses: f64,
}

struct CategoryTotals {
    category: Category,
    spent: f64,
    count: usize,
}

/// Builds a [`Summary`] from a transaction list
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    options: AggregateOptions,
}

impl Aggregator {
    pub fn new(options: AggregateOptions) -> Self {
        Self { options }
    }

    /// Aggregate transactions. `None` means there was nothing to aggregate,
    /// which callers treat as a valid empty state.
    pub fn aggregate(&self, txns: &[Transaction]) -> Option<Summary> {
        if txns.is_empty() {
            warn!("No transactions to aggregate");
            return None;
        }

        let mut months: BTreeMap<(i32, u32), MonthTotals> = BTreeMap::new();
        let mut categories: Vec<CategoryTotals> = Vec::new();
        let mut category_index: HashMap<Category, usize> = HashMap::new();
        let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();

        for txn in txns {
            let month = months.entry((txn.date.year(), txn.date.month())).or_default();
            if txn.is_income() {
                month.income += txn.amount;
            } else {
                month.expenses += txn.abs_amount();
            }

            if !txn.is_expense() {
                continue;
            }

            let idx = *category_index.entry(txn.category).or_insert_with(|| {
                categories.push(CategoryTotals {
                    category: txn.category,
                    spent: 0.0,
                    count: 0,
                });
                categories.len() - 1
            });
            categories[idx].spent += txn.abs_amount();
            categories[idx].count += 1;

            *days.entry(txn.date).or_insert(0.0) += txn.abs_amount();
        }

        let monthly = months
            .into_iter()
            .map(|((year, month), totals)| monthly_summary(year, month, totals))
            .collect();

        let total_spend: f64 = categories.iter().map(|c| c.spent).sum();
        let categories = categories
            .into_iter()
            .map(|c| CategorySummary {
                category: c.category,
                spent: c.spent,
                transaction_count: c.count,
                budget: self.options.budgets.budget_for(c.category, c.spent),
                percentage_of_total_spend: if total_spend > 0.0 {
                    c.spent / total_spend * 100.0
                } else {
                    0.0
                },
            })
            .collect::<Vec<_>>();

        let skip = days.len().saturating_sub(self.options.daily_window);
        let daily = days
            .into_iter()
            .skip(skip)
            .map(|(day, spending)| DailySummary { day, spending })
            .collect::<Vec<_>>();

        debug!(
            "Aggregated {} transactions into {} categories, {} days",
            txns.len(),
            categories.len(),
            daily.len()
        );

        Some(Summary {
            monthly,
            categories,
            daily,
            transactions: txns.to_vec(),
        })
    }
}

/// Aggregate with default options (10% budget headroom, 30-day window).
pub fn aggregate(txns: &[Transaction]) -> Option<Summary> {
    Aggregator::default().aggregate(txns)
}

fn monthly_summary(year: i32, month: u32, totals: MonthTotals) -> MonthlySummary {
    let savings = totals.income - totals.expenses;
    let savings_rate = if totals.income > 0.0 {
        savings / totals.income * 100.0
    } else {
        0.0
    };

    MonthlySummary {
        key: format!("{:04}-{:02}", year, month),
        label: month_label(year, month),
        income: totals.income,
        expenses: totals.expenses,
        savings,
        savings_rate,
    }
}

/// Short month and two-digit year, e.g. `Jan 24`
fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %y").to_string())
        .unwrap_or_else(|| format!("{:04}-{:02}", year, month))
}
