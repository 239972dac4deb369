//! Record normalizer: heterogeneous bank rows → canonical transactions.
//!
//! Every field is resolved through an ordered list of header aliases, so the
//! same code handles `Date,Description,Amount` exports as well as
//! `Transaction Date,Narration,Debit,Credit` ones. Rows that cannot produce a
//! valid date, description and non-negligible amount are rejected whole.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info};

use tally_core::{MIN_AMOUNT, Transaction, categorize_transaction};

use crate::error::Rejection;
use crate::types::{
    AMOUNT_HEADERS, CREDIT_HEADER, DATE_HEADERS, DEBIT_HEADER, DESCRIPTION_HEADERS, Normalized,
    RawRow,
};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", // 2024-01-15
    "%Y/%m/%d", // 2024/01/15
    "%d/%m/%Y", // 15/01/2024
    "%d-%m-%Y", // 15-01-2024
    "%d %b %Y", // 15 Jan 2024
    "%d %B %Y", // 15 January 2024
];

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<sign>[-+])?(?:ZAR|R)?(?P<num>\d+(?:\.\d+)?|\.\d+)$")
            .expect("invalid amount regex")
    })
}

fn decimal_comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^,]*\d,\d{1,2}$").expect("invalid decimal comma regex"))
}

/// Normalize one row, or say why it was rejected.
pub fn normalize(row: &RawRow) -> Result<Transaction, Rejection> {
    let date_raw = first_present(row, DATE_HEADERS).ok_or(Rejection::MissingDate)?;
    let date = parse_date(date_raw).ok_or_else(|| Rejection::InvalidDate(date_raw.to_string()))?;

    let description =
        first_present(row, DESCRIPTION_HEADERS).ok_or(Rejection::EmptyDescription)?;

    let amount = resolve_amount(row)?;
    if amount.abs() < MIN_AMOUNT {
        return Err(Rejection::NegligibleAmount(amount));
    }

    let category = categorize_transaction(description, amount);
    Ok(Transaction::new(date, description, amount, category))
}

/// Normalize a batch, dropping rejected rows.
pub fn normalize_rows(rows: &[RawRow]) -> Normalized {
    let mut out = Normalized::default();

    for (i, row) in rows.iter().enumerate() {
        match normalize(row) {
            Ok(txn) => out.transactions.push(txn),
            Err(reason) => {
                debug!("Skipping row {}: {}", i + 1, reason);
                out.rejected += 1;
            }
        }
    }

    info!(
        "Normalized {} of {} rows ({} rejected)",
        out.transactions.len(),
        rows.len(),
        out.rejected
    );
    out
}

/// First alias whose value is non-empty after trimming.
fn first_present<'a>(row: &'a RawRow, aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .filter_map(|h| row.get(*h))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
}

fn non_empty<'a>(row: &'a RawRow, header: &str) -> Option<&'a str> {
    row.get(header).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Amount resolution order:
/// 1. `Amount`/`amount` parsed as a signed number
/// 2. both `Debit` and `Credit` columns present → `Credit - Debit`, where an
///    empty or unparseable side counts as zero
/// 3. a lone `Debit` or `Credit` value parsed as a signed number
fn resolve_amount(row: &RawRow) -> Result<f64, Rejection> {
    if let Some(raw) = first_present(row, AMOUNT_HEADERS) {
        return parse_amount(raw).ok_or_else(|| Rejection::InvalidAmount(raw.to_string()));
    }

    let debit = non_empty(row, DEBIT_HEADER);
    let credit = non_empty(row, CREDIT_HEADER);
    let has_both_columns = row.contains_key(DEBIT_HEADER) && row.contains_key(CREDIT_HEADER);

    if has_both_columns && (debit.is_some() || credit.is_some()) {
        let side = |v: Option<&str>| v.and_then(parse_amount).unwrap_or(0.0);
        return Ok(side(credit) - side(debit));
    }

    match debit.or(credit) {
        Some(raw) => parse_amount(raw).ok_or_else(|| Rejection::InvalidAmount(raw.to_string())),
        None => Err(Rejection::MissingAmount),
    }
}

/// Parse a bank-formatted amount.
///
/// Accepts an optional `R`/`ZAR` marker, spaces and thousands commas,
/// accounting parentheses for negatives, and a decimal comma when there is
/// no dot. Returns None for anything else.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let mut s: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    let mut negate = false;
    if s.len() > 2 && s.starts_with('(') && s.ends_with(')') {
        s = s[1..s.len() - 1].to_string();
        negate = true;
    }

    // "1.234,56": dot-grouped with a decimal comma
    if let (Some(comma), Some(dot)) = (s.rfind(','), s.rfind('.')) {
        if comma > dot {
            return None;
        }
    }

    if s.contains(',') {
        if !s.contains('.') && decimal_comma_re().is_match(&s) && s.matches(',').count() == 1 {
            s = s.replace(',', ".");
        } else {
            s = s.replace(',', "");
        }
    }

    let caps = amount_re().captures(&s)?;
    let value: f64 = caps["num"].parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    let signed = match caps.name("sign").map(|m| m.as_str()) {
        Some("-") => -value,
        _ => value,
    };
    Some(if negate { -signed } else { signed })
}

/// Parse the date formats South African bank exports use.
/// A trailing time component (ISO `T` or space separated) is ignored.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(d) = parse_date_only(s) {
        return Some(d);
    }

    // "2024-01-15T10:30:00" / "2024-01-15 10:30"
    let head = s.split(['T', ' ']).next()?;
    if head != s {
        return parse_date_only(head);
    }
    None
}

fn parse_date_only(s: &str) -> Option<NaiveDate> {
    // YYYYMMDD, handled by hand since %Y is greedy
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = s[0..4].parse().ok()?;
        let month: u32 = s[4..6].parse().ok()?;
        let day: u32 = s[6..8].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{Category, TxnType};

    fn row(fields: &[(&str, &str)]) -> RawRow {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_normalizes_template_row() {
        let r = row(&[
            ("Date", "2024-01-15"),
            ("Description", "  Pick n Pay Groceries "),
            ("Amount", "-450.00"),
            ("Category", "Groceries"),
        ]);
        let txn = normalize(&r).unwrap();
        assert_eq!(txn.date, ymd(2024, 1, 15));
        assert_eq!(txn.description, "Pick n Pay Groceries");
        assert_eq!(txn.amount, -450.0);
        assert_eq!(txn.txn_type, TxnType::Debit);
        assert_eq!(txn.category, Category::FoodAndGroceries);
    }

    #[test]
    fn test_salary_credit_is_income() {
        let r = row(&[("Date", "2024-01-15"), ("Description", "Salary"), ("Amount", "28000.00")]);
        let txn = normalize(&r).unwrap();
        assert_eq!(txn.category, Category::Income);
        assert_eq!(txn.txn_type, TxnType::Credit);
    }

    #[test]
    fn test_header_aliases() {
        let r = row(&[
            ("Transaction Date", "15/01/2024"),
            ("Narration", "Shell Petrol"),
            ("amount", "-850"),
        ]);
        let txn = normalize(&r).unwrap();
        assert_eq!(txn.date, ymd(2024, 1, 15));
        assert_eq!(txn.category, Category::Transportation);

        let r = row(&[("Post Date", "2024-02-01"), ("Memo", "Netflix"), ("Amount", "-199")]);
        assert_eq!(normalize(&r).unwrap().category, Category::Entertainment);

        let r = row(&[("Posting Date", "2024-02-01"), ("Reference", "Eskom"), ("Amount", "-900")]);
        assert_eq!(normalize(&r).unwrap().category, Category::UtilitiesAndServices);
    }

    #[test]
    fn test_empty_alias_falls_through_to_next() {
        let r = row(&[
            ("Date", ""),
            ("Transaction Date", "2024-03-01"),
            ("Description", "   "),
            ("Reference", "Clicks"),
            ("Amount", "-50"),
        ]);
        let txn = normalize(&r).unwrap();
        assert_eq!(txn.date, ymd(2024, 3, 1));
        assert_eq!(txn.description, "Clicks");
    }

    #[test]
    fn test_rejects_unparseable_amount() {
        let r = row(&[("Date", "2024-01-15"), ("Description", "Mystery"), ("Amount", "abc")]);
        assert_eq!(normalize(&r), Err(Rejection::InvalidAmount("abc".into())));
    }

    #[test]
    fn test_debit_credit_columns() {
        let r = row(&[("Date", "2024-01-15"), ("Description", "ATM"), ("Debit", "100"), ("Credit", "0")]);
        assert_eq!(normalize(&r).unwrap().amount, -100.0);

        let r = row(&[("Date", "2024-01-15"), ("Description", "Refund"), ("Debit", ""), ("Credit", "250.50")]);
        assert_eq!(normalize(&r).unwrap().amount, 250.5);

        let r = row(&[("Date", "2024-01-15"), ("Description", "Fee"), ("Debit", "35"), ("Credit", "n/a")]);
        assert_eq!(normalize(&r).unwrap().amount, -35.0);
    }

    #[test]
    fn test_lone_debit_or_credit_parsed_as_signed() {
        let r = row(&[("Date", "2024-01-15"), ("Description", "Bank charges"), ("Debit", "-12.50")]);
        assert_eq!(normalize(&r).unwrap().amount, -12.5);

        let r = row(&[("Date", "2024-01-15"), ("Description", "Interest"), ("Credit", "4.10")]);
        assert_eq!(normalize(&r).unwrap().amount, 4.1);
    }

    #[test]
    fn test_amount_column_wins_over_debit_credit() {
        let r = row(&[
            ("Date", "2024-01-15"),
            ("Description", "Spar"),
            ("Amount", "-75"),
            ("Debit", "999"),
            ("Credit", "0"),
        ]);
        assert_eq!(normalize(&r).unwrap().amount, -75.0);
    }

    #[test]
    fn test_rejections() {
        let missing_date = row(&[("Description", "Spar"), ("Amount", "-5")]);
        assert_eq!(normalize(&missing_date), Err(Rejection::MissingDate));

        let bad_date = row(&[("Date", "2024-13-45"), ("Description", "Spar"), ("Amount", "-5")]);
        assert_eq!(normalize(&bad_date), Err(Rejection::InvalidDate("2024-13-45".into())));

        let no_desc = row(&[("Date", "2024-01-15"), ("Description", ""), ("Amount", "-5")]);
        assert_eq!(normalize(&no_desc), Err(Rejection::EmptyDescription));

        let no_amount = row(&[("Date", "2024-01-15"), ("Description", "Spar")]);
        assert_eq!(normalize(&no_amount), Err(Rejection::MissingAmount));

        let zero = row(&[("Date", "2024-01-15"), ("Description", "Spar"), ("Amount", "0.00")]);
        assert_eq!(normalize(&zero), Err(Rejection::NegligibleAmount(0.0)));
    }

    #[test]
    fn test_threshold_boundary() {
        let keep = row(&[("Date", "2024-01-15"), ("Description", "Spar"), ("Amount", "0.01")]);
        assert_eq!(normalize(&keep).unwrap().amount, 0.01);

        let drop = row(&[("Date", "2024-01-15"), ("Description", "Spar"), ("Amount", "0.009")]);
        assert!(matches!(normalize(&drop), Err(Rejection::NegligibleAmount(_))));

        let drop_neg = row(&[("Date", "2024-01-15"), ("Description", "Spar"), ("Amount", "-0.009")]);
        assert!(normalize(&drop_neg).is_err());
    }

    #[test]
    fn test_normalize_rows_counts_rejections() {
        let rows = vec![
            row(&[("Date", "2024-01-15"), ("Description", "Pick n Pay"), ("Amount", "-450")]),
            row(&[("Date", "2024-01-15"), ("Description", "Mystery"), ("Amount", "abc")]),
            row(&[("Date", "not a date"), ("Description", "Spar"), ("Amount", "-1")]),
        ];
        let out = normalize_rows(&rows);
        assert_eq!(out.transactions.len(), 1);
        assert_eq!(out.rejected, 2);
    }

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount("-450.00"), Some(-450.0));
        assert_eq!(parse_amount("+12"), Some(12.0));
        assert_eq!(parse_amount("R 1,234.50"), Some(1234.5));
        assert_eq!(parse_amount("-R1 234.50"), Some(-1234.5));
        assert_eq!(parse_amount("ZAR 99.95"), Some(99.95));
        assert_eq!(parse_amount("(450.00)"), Some(-450.0));
        assert_eq!(parse_amount("450,75"), Some(450.75));
        assert_eq!(parse_amount("1,234"), Some(1234.0));
        assert_eq!(parse_amount(".5"), Some(0.5));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("12-3"), None);
    }

    #[test]
    fn test_dot_grouped_decimal_comma_is_rejected() {
        assert_eq!(parse_amount("1.234,56"), None);
        assert_eq!(parse_amount("R 1.234,56"), None);
        // dot after the last comma is still an ordinary grouped amount
        assert_eq!(parse_amount("1,234.56"), Some(1234.56));

        let r = row(&[("Date", "2024-01-15"), ("Description", "Spar"), ("Amount", "-1.234,56")]);
        assert_eq!(normalize(&r), Err(Rejection::InvalidAmount("-1.234,56".into())));
    }

    #[test]
    fn test_parse_date_formats() {
        let want = ymd(2024, 1, 15);
        assert_eq!(parse_date("2024-01-15"), Some(want));
        assert_eq!(parse_date("2024/01/15"), Some(want));
        assert_eq!(parse_date("15/01/2024"), Some(want));
        assert_eq!(parse_date("15-01-2024"), Some(want));
        assert_eq!(parse_date("20240115"), Some(want));
        assert_eq!(parse_date("15 Jan 2024"), Some(want));
        assert_eq!(parse_date("15 January 2024"), Some(want));
        assert_eq!(parse_date("2024-01-15T10:30:00"), Some(want));
        assert_eq!(parse_date("2024-01-15 10:30"), Some(want));
        assert_eq!(parse_date("31/02/2024"), None);
        assert_eq!(parse_date("Invalid Date"), None);
        assert_eq!(parse_date(""), None);
    }
}
