//! Plain-text rendering of an [`Analysis`] for the terminal.

use std::fmt::{self, Write};

use tally_finance::insights::recommendation_lines;
use tally_finance::{Analysis, Report, format_compact_zar, format_percentage, format_zar};

/// Days of the daily series shown in the text report
const DAILY_ROWS: usize = 7;

pub fn write_analysis<W: Write>(out: &mut W, analysis: &Analysis) -> fmt::Result {
    match &analysis.report {
        Some(report) => write_report(out, report)?,
        None => out.write_str("No valid transactions found.\n")?,
    }

    if analysis.rejected_rows > 0 {
        writeln!(
            out,
            "\n{} row(s) skipped as malformed (missing date, description or amount).",
            analysis.rejected_rows
        )?;
    }
    Ok(())
}

fn write_report<W: Write>(out: &mut W, report: &Report) -> fmt::Result {
    let summary = &report.summary;
    let insights = &report.insights;

    writeln!(out, "# Financial summary\n")?;
    writeln!(
        out,
        "Transactions: {} | Total spend: {} across {} categories",
        summary.total_transactions(),
        format_compact_zar(summary.total_spend()),
        summary.categories.len()
    )?;
    writeln!(
        out,
        "Average income: {} | Average expenses: {} | Savings rate: {}\n",
        format_zar(insights.metrics.average_income),
        format_zar(insights.metrics.average_expenses),
        format_percentage(insights.metrics.average_savings_rate, 1)
    )?;

    writeln!(out, "## Monthly\n")?;
    writeln!(
        out,
        "{:<8} {:>16} {:>16} {:>16} {:>8}",
        "Month", "Income", "Expenses", "Savings", "Rate"
    )?;
    for m in &summary.monthly {
        writeln!(
            out,
            "{:<8} {:>16} {:>16} {:>16} {:>8}",
            m.label,
            format_zar(m.income),
            format_zar(m.expenses),
            format_zar(m.savings),
            format_percentage(m.savings_rate, 1)
        )?;
    }

    writeln!(out, "\n## Categories\n")?;
    writeln!(
        out,
        "{:<22} {:>14} {:>6} {:>14} {:>7}",
        "Category", "Spent", "Count", "Budget", "Share"
    )?;
    for c in &summary.categories {
        let flag = if c.is_over_budget() { " !" } else { "" };
        writeln!(
            out,
            "{:<22} {:>14} {:>6} {:>14} {:>7}{}",
            c.category.as_str(),
            format_zar(c.spent),
            c.transaction_count,
            format_zar(c.budget),
            format_percentage(c.percentage_of_total_spend, 1),
            flag
        )?;
    }

    if !summary.daily.is_empty() {
        let shown = summary.daily.len().min(DAILY_ROWS);
        writeln!(out, "\n## Recent daily spending (last {} days)\n", shown)?;
        for d in &summary.daily[summary.daily.len() - shown..] {
            writeln!(out, "{}  {:>14}", d.day, format_zar(d.spending))?;
        }
    }

    writeln!(out, "\n## Insights\n")?;
    if let (Some(best), Some(worst)) = (&insights.best_month, &insights.worst_month) {
        writeln!(
            out,
            "Best month: {} ({}) | Worst month: {} ({})",
            best.label,
            format_percentage(best.savings_rate, 1),
            worst.label,
            format_percentage(worst.savings_rate, 1)
        )?;
    }
    if let Some(top) = &insights.top_category {
        writeln!(
            out,
            "Top category: {} at {} ({} of spend)",
            top.category,
            format_zar(top.spent),
            format_percentage(top.share, 1)
        )?;
    }
    for f in insights.notes() {
        writeln!(out, "- {}", f.message())?;
    }

    let alerts: Vec<_> = insights.alerts().collect();
    if !alerts.is_empty() {
        writeln!(out, "\n## Alerts\n")?;
        for f in alerts {
            writeln!(out, "[{}] {}", f.severity(), f.message())?;
        }
    }

    writeln!(out, "\n## Recommendations\n")?;
    for line in recommendation_lines(insights) {
        writeln!(out, "- {}", line)?;
    }
    Ok(())
}
