//! South African Rand formatting for reports.

/// `R 1 234.56`, space-grouped, two decimals. Negatives get a leading `-`.
pub fn format_zar(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R {}.{:02}", sign, group_thousands(cents / 100), cents % 100)
}

/// `R1.2K` / `R3.4M` for large values, full format otherwise.
pub fn format_compact_zar(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        format!("R{:.1}M", amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("R{:.1}K", amount / 1_000.0)
    } else {
        format_zar(amount)
    }
}

pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}
