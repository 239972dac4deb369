//! Seeded demo data: a year of South African salary and spending.
//!
//! Output depends only on the seed and the clock's date, so fixtures built
//! from it are reproducible.

use chrono::{Datelike, Days, Months, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use tally_core::{Category, Clock, Transaction};

const SALARY_MONTHS: u32 = 12;
const EXPENSE_COUNT: usize = 300;
const SPAN_DAYS: u64 = 365;
const SALARY_DAY: u32 = 25;

fn descriptions(category: Category) -> &'static [&'static str] {
    match category {
        Category::FoodAndGroceries => &["Checkers Purchase", "Pick n Pay", "Woolworths Food", "Nandos", "KFC"],
        Category::Transportation => &["Shell Petrol", "Uber Trip", "Gautrain", "Parking"],
        Category::Shopping => &["Mr Price", "Takealot Order", "Edgars", "Game Store"],
        Category::Entertainment => &["Ster Kinekor", "Netflix", "DStv Subscription"],
        Category::UtilitiesAndServices => &["Eskom Bill", "Vodacom", "City Rates", "Discovery Insurance"],
        Category::Healthcare => &["Clicks Pharmacy", "Dr Consultation", "Medical Aid"],
        Category::BankingAndFinance => &["FNB Service Fee", "ATM Withdrawal"],
        Category::Education => &["School Fees", "University Tuition"],
        Category::Income | Category::Other => &["General Purchase"],
    }
}

/// (min, span) of a debit in rand, per category
fn amount_range(category: Category) -> (f64, f64) {
    match category {
        Category::FoodAndGroceries => (200.0, 800.0),
        Category::Transportation => (100.0, 600.0),
        Category::UtilitiesAndServices => (500.0, 1500.0),
        Category::Healthcare => (200.0, 1000.0),
        _ => (50.0, 500.0),
    }
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub struct SampleGenerator<C: Clock> {
    rng: StdRng,
    clock: C,
}

impl<C: Clock> SampleGenerator<C> {
    pub fn new(seed: u64, clock: C) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            clock,
        }
    }

    /// First day covered by the generated data: twelve months before today.
    pub fn start_date(&self) -> NaiveDate {
        let today = self.clock.today();
        today
            .checked_sub_months(Months::new(SALARY_MONTHS))
            .unwrap_or(today)
    }

    /// Twelve salary credits plus 300 debits, sorted by date.
    pub fn generate(&mut self) -> Vec<Transaction> {
        let start = self.start_date();
        let mut txns = Vec::with_capacity(SALARY_MONTHS as usize + EXPENSE_COUNT);

        for i in 0..SALARY_MONTHS {
            let payday = start
                .checked_add_months(Months::new(i))
                .and_then(|d| d.with_day(SALARY_DAY));
            if let Some(date) = payday {
                let amount = round_cents(25_000.0 + self.rng.random::<f64>() * 10_000.0);
                txns.push(Transaction::new(date, "Salary Deposit", amount, Category::Income));
            }
        }

        for _ in 0..EXPENSE_COUNT {
            let offset = self.rng.random_range(0..SPAN_DAYS);
            let Some(date) = start.checked_add_days(Days::new(offset)) else {
                continue;
            };

            let category = Category::SPENDING[self.rng.random_range(0..Category::SPENDING.len())];
            let options = descriptions(category);
            let description = options[self.rng.random_range(0..options.len())];

            let (min, span) = amount_range(category);
            let amount = round_cents(-(self.rng.random::<f64>() * span + min));
            txns.push(Transaction::new(date, description, amount, category));
        }

        txns.sort_by_key(|t| t.date);
        debug!(
            "Generated {} sample transactions from {}",
            txns.len(),
            start
        );
        txns
    }
}

/// One-shot helper around [`SampleGenerator`].
pub fn generate_sample_data<C: Clock>(seed: u64, clock: C) -> Vec<Transaction> {
    SampleGenerator::new(seed, clock).generate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::FixedClock;

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap())
    }

    #[test]
    fn test_same_seed_same_data() {
        let a = generate_sample_data(42, clock());
        let b = generate_sample_data(42, clock());
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_different_data() {
        let a = generate_sample_data(1, clock());
        let b = generate_sample_data(2, clock());
        assert_ne!(a, b);
    }

    #[test]
    fn test_shape() {
        let txns = generate_sample_data(7, clock());
        assert_eq!(txns.len(), 312);
        assert!(txns.windows(2).all(|w| w[0].date <= w[1].date));

        // salaries fall on the 25th of the start month, before the start date
        let first_month = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap() + chrono::Duration::days(365);
        assert!(txns.iter().all(|t| t.date >= first_month && t.date < end));
    }

    #[test]
    fn test_salaries() {
        let txns = generate_sample_data(7, clock());
        let salaries: Vec<_> = txns.iter().filter(|t| t.category == Category::Income).collect();
        assert_eq!(salaries.len(), 12);
        for s in &salaries {
            assert_eq!(s.date.day(), 25);
            assert!(s.amount >= 25_000.0 && s.amount <= 35_000.0);
            assert!(s.is_income());
        }
        assert_eq!(salaries[0].date, NaiveDate::from_ymd_opt(2023, 6, 25).unwrap());
    }

    #[test]
    fn test_expenses_are_debits_in_range() {
        let txns = generate_sample_data(99, clock());
        for t in txns.iter().filter(|t| t.category != Category::Income) {
            assert!(t.is_expense());
            let (min, span) = amount_range(t.category);
            assert!(t.abs_amount() >= min - 0.01 && t.abs_amount() <= min + span + 0.01);
            assert!(descriptions(t.category).contains(&t.description.as_str()));
            // cents precision
            assert!(((t.amount * 100.0).round() - t.amount * 100.0).abs() < 1e-6);
        }
    }
}
