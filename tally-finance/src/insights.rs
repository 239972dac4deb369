//! Insight and benchmark rules over an aggregated [`Summary`].
//!
//! Everything here is a read-only derivation: the summary is never touched
//! and nothing is cached between calls.

use serde::{Deserialize, Serialize};
use std::fmt;

use tally_core::{Category, CategorySummary, MonthlySummary, Summary};

use crate::currency::{format_percentage, format_zar};

/// Thresholds the rules compare against. Rates and shares are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Benchmarks {
    /// Average savings rate below this raises a critical alert
    pub critical_savings_rate: f64,
    /// Average savings rate below this is "below target"
    pub target_savings_rate: f64,
    /// Above this the savings rate is called excellent
    pub excellent_savings_rate: f64,
    /// Spend above `budget * overspend_factor` is itemised as an alert
    pub overspend_factor: f64,
    /// Top category share above this is called out
    pub dominant_category_share: f64,
    /// Fraction of the top category suggested as a cut
    pub category_reduction: f64,
    /// Savings rate the gap recommendation aims for
    pub goal_savings_rate: f64,
    pub recommended_savings_min: f64,
    pub recommended_savings_max: f64,
    /// Months of expenses an emergency fund should cover
    pub emergency_fund_months: f64,
    /// South African household savings rate
    pub national_savings_rate: f64,
    /// Annual tax-free savings account contribution limit (ZAR)
    pub tax_free_savings_limit: f64,
}

impl Default for Benchmarks {
    fn default() -> Self {
        Self {
            critical_savings_rate: 5.0,
            target_savings_rate: 10.0,
            excellent_savings_rate: 15.0,
            overspend_factor: 1.2,
            dominant_category_share: 30.0,
            category_reduction: 0.1,
            goal_savings_rate: 20.0,
            recommended_savings_min: 15.0,
            recommended_savings_max: 20.0,
            emergency_fund_months: 4.0,
            national_savings_rate: -0.1,
            tax_free_savings_limit: 36_000.0,
        }
    }
}

/// How loudly a finding should be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Positive or neutral observation
    Info,
    /// Worth attention but not urgent
    Attention,
    /// Should be addressed soon
    Warning,
    /// Requires immediate attention
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Attention => "attention",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One qualitative observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    ExcellentSavingsRate { rate: f64 },
    GoodSavingsRate { rate: f64 },
    CategoriesUnderBudget { count: usize },
    BelowTargetSavingsRate { rate: f64, target: f64 },
    DominantCategory { category: Category, share: f64 },
    CategoriesOverBudget { count: usize },
    CriticalSavingsRate { rate: f64, threshold: f64 },
    CategoryOverspend { category: Category, percent_over: f64 },
}

impl Finding {
    pub fn severity(&self) -> Severity {
        match self {
            Finding::ExcellentSavingsRate { .. }
            | Finding::GoodSavingsRate { .. }
            | Finding::CategoriesUnderBudget { .. } => Severity::Info,
            Finding::BelowTargetSavingsRate { .. }
            | Finding::DominantCategory { .. }
            | Finding::CategoriesOverBudget { .. } => Severity::Attention,
            Finding::CategoryOverspend { .. } => Severity::Warning,
            Finding::CriticalSavingsRate { .. } => Severity::Critical,
        }
    }

    /// Alerts are findings that need action
    pub fn is_alert(&self) -> bool {
        self.severity() >= Severity::Warning
    }

    pub fn message(&self) -> String {
        match self {
            Finding::ExcellentSavingsRate { rate } => {
                format!("Excellent savings rate of {}", format_percentage(*rate, 1))
            }
            Finding::GoodSavingsRate { rate } => {
                format!("Good savings rate of {}", format_percentage(*rate, 1))
            }
            Finding::CategoriesUnderBudget { count } => {
                format!("{} categories under budget", count)
            }
            Finding::BelowTargetSavingsRate { rate, target } => format!(
                "Savings rate of {} is below the {} SA target",
                format_percentage(*rate, 1),
                threshold_label(*target)
            ),
            Finding::DominantCategory { category, share } => format!(
                "{} takes up {} of spending",
                category,
                format_percentage(*share, 1)
            ),
            Finding::CategoriesOverBudget { count } => {
                format!("{} categories over budget", count)
            }
            Finding::CriticalSavingsRate { rate, threshold } => format!(
                "Critical: savings rate of {} is below {}, consider an urgent budget review",
                format_percentage(*rate, 1),
                threshold_label(*threshold)
            ),
            Finding::CategoryOverspend {
                category,
                percent_over,
            } => format!(
                "{} spending is {} over budget",
                category,
                format_percentage(*percent_over, 1)
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub average_income: f64,
    pub average_expenses: f64,
    pub average_savings_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthHighlight {
    pub key: String,
    pub label: String,
    pub savings_rate: f64,
}

impl From<&MonthlySummary> for MonthHighlight {
    fn from(m: &MonthlySummary) -> Self {
        Self {
            key: m.key.clone(),
            label: m.label.clone(),
            savings_rate: m.savings_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCategory {
    pub category: Category,
    pub spent: f64,
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    /// Cut applied to the top category, as a percentage
    pub category_reduction_pct: f64,
    /// Saved by cutting the top category by `category_reduction_pct`
    pub top_category_saving: Option<f64>,
    /// Savings rate the gap is measured against
    pub goal_savings_rate: f64,
    /// Extra monthly savings needed to reach `goal_savings_rate`
    pub savings_gap_to_goal: Option<f64>,
    pub emergency_fund_target: f64,
    pub recommended_savings_min: f64,
    pub recommended_savings_max: f64,
    pub tax_free_savings_limit: f64,
    /// Average savings rate beats the national household rate
    pub above_national_average: bool,
}

/// Everything derived from one summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub metrics: KeyMetrics,
    pub best_month: Option<MonthHighlight>,
    pub worst_month: Option<MonthHighlight>,
    pub top_category: Option<TopCategory>,
    pub over_budget: Vec<Category>,
    pub under_budget: Vec<Category>,
    pub findings: Vec<Finding>,
    pub recommendations: Recommendations,
}

impl Insights {
    pub fn alerts(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_alert())
    }

    pub fn notes(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_alert())
    }
}

/// Derive insights from a summary.
pub fn derive_insights(summary: &Summary, bench: &Benchmarks) -> Insights {
    let metrics = key_metrics(&summary.monthly);
    let rate = metrics.average_savings_rate;

    let best_month = best_month(&summary.monthly).map(MonthHighlight::from);
    let worst_month = worst_month(&summary.monthly).map(MonthHighlight::from);
    let top_category = top_category(&summary.categories).map(|c| TopCategory {
        category: c.category,
        spent: c.spent,
        share: c.percentage_of_total_spend,
    });

    let over_budget: Vec<Category> = summary
        .categories
        .iter()
        .filter(|c| c.is_over_budget())
        .map(|c| c.category)
        .collect();
    let under_budget: Vec<Category> = summary
        .categories
        .iter()
        .filter(|c| c.is_under_budget())
        .map(|c| c.category)
        .collect();

    let mut findings = Vec::new();

    if rate > bench.excellent_savings_rate {
        findings.push(Finding::ExcellentSavingsRate { rate });
    } else if rate > bench.target_savings_rate {
        findings.push(Finding::GoodSavingsRate { rate });
    }
    if !under_budget.is_empty() {
        findings.push(Finding::CategoriesUnderBudget {
            count: under_budget.len(),
        });
    }

    if rate < bench.target_savings_rate {
        findings.push(Finding::BelowTargetSavingsRate {
            rate,
            target: bench.target_savings_rate,
        });
    }
    if let Some(top) = &top_category {
        if top.share > bench.dominant_category_share {
            findings.push(Finding::DominantCategory {
                category: top.category,
                share: top.share,
            });
        }
    }
    if !over_budget.is_empty() {
        findings.push(Finding::CategoriesOverBudget {
            count: over_budget.len(),
        });
    }

    if rate < bench.critical_savings_rate {
        findings.push(Finding::CriticalSavingsRate {
            rate,
            threshold: bench.critical_savings_rate,
        });
    }
    for c in &summary.categories {
        if c.budget > 0.0 && c.spent > c.budget * bench.overspend_factor {
            findings.push(Finding::CategoryOverspend {
                category: c.category,
                percent_over: (c.spent / c.budget - 1.0) * 100.0,
            });
        }
    }

    let recommendations = recommendations(&metrics, top_category.as_ref(), bench);

    Insights {
        metrics,
        best_month,
        worst_month,
        top_category,
        over_budget,
        under_budget,
        findings,
        recommendations,
    }
}

fn key_metrics(monthly: &[MonthlySummary]) -> KeyMetrics {
    if monthly.is_empty() {
        return KeyMetrics {
            average_income: 0.0,
            average_expenses: 0.0,
            average_savings_rate: 0.0,
        };
    }

    let n = monthly.len() as f64;
    KeyMetrics {
        average_income: monthly.iter().map(|m| m.income).sum::<f64>() / n,
        average_expenses: monthly.iter().map(|m| m.expenses).sum::<f64>() / n,
        average_savings_rate: monthly.iter().map(|m| m.savings_rate).sum::<f64>() / n,
    }
}

/// Highest savings rate; the earliest month wins a tie.
fn best_month(monthly: &[MonthlySummary]) -> Option<&MonthlySummary> {
    monthly.iter().fold(None, |best: Option<&MonthlySummary>, m| match best {
        Some(b) if m.savings_rate <= b.savings_rate => Some(b),
        _ => Some(m),
    })
}

/// Lowest savings rate; the earliest month wins a tie.
fn worst_month(monthly: &[MonthlySummary]) -> Option<&MonthlySummary> {
    monthly.iter().fold(None, |worst: Option<&MonthlySummary>, m| match worst {
        Some(w) if m.savings_rate >= w.savings_rate => Some(w),
        _ => Some(m),
    })
}

/// Largest spend; the first-seen category wins a tie.
fn top_category(categories: &[CategorySummary]) -> Option<&CategorySummary> {
    categories.iter().fold(None, |top: Option<&CategorySummary>, c| match top {
        Some(t) if c.spent <= t.spent => Some(t),
        _ => Some(c),
    })
}

fn recommendations(
    metrics: &KeyMetrics,
    top: Option<&TopCategory>,
    bench: &Benchmarks,
) -> Recommendations {
    let income = metrics.average_income;
    let expenses = metrics.average_expenses;
    let gap = income * bench.goal_savings_rate / 100.0 - (income - expenses);

    Recommendations {
        category_reduction_pct: bench.category_reduction * 100.0,
        top_category_saving: top.map(|t| t.spent * bench.category_reduction),
        goal_savings_rate: bench.goal_savings_rate,
        savings_gap_to_goal: (gap > 0.0).then_some(gap),
        emergency_fund_target: expenses * bench.emergency_fund_months,
        recommended_savings_min: income * bench.recommended_savings_min / 100.0,
        recommended_savings_max: income * bench.recommended_savings_max / 100.0,
        tax_free_savings_limit: bench.tax_free_savings_limit,
        above_national_average: metrics.average_savings_rate > bench.national_savings_rate,
    }
}

/// `10%`, `12.5%`: a configured percentage without trailing zeros
fn threshold_label(pct: f64) -> String {
    format!("{}%", (pct * 100.0).round() / 100.0)
}

/// Human-readable lines for the recommendations block
pub fn recommendation_lines(insights: &Insights) -> Vec<String> {
    let rec = &insights.recommendations;
    let mut lines = Vec::new();

    if let (Some(top), Some(saving)) = (&insights.top_category, rec.top_category_saving) {
        lines.push(format!(
            "Reducing {} by {} would save {}",
            top.category,
            threshold_label(rec.category_reduction_pct),
            format_zar(saving)
        ));
    }
    if let Some(gap) = rec.savings_gap_to_goal {
        lines.push(format!(
            "Save {} more each month to reach a {} savings rate",
            format_zar(gap),
            threshold_label(rec.goal_savings_rate)
        ));
    }
    lines.push(format!(
        "Recommended savings: {} - {} per month",
        format_zar(rec.recommended_savings_min),
        format_zar(rec.recommended_savings_max)
    ));
    lines.push(format!(
        "Emergency fund target: {}",
        format_zar(rec.emergency_fund_target)
    ));
    lines.push(format!(
        "Tax-free savings allowance: {} per year",
        format_zar(rec.tax_free_savings_limit)
    ));
    lines.push(if rec.above_national_average {
        "Savings rate is above the SA household average".to_string()
    } else {
        "Savings rate is below the SA household average".to_string()
    });

    lines
}
