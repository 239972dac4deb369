//! tally-core: transaction model, keyword categorizer, and summary types

pub mod categorizer;
pub mod finance;
pub mod summary;
pub mod time;

pub use categorizer::{categorize, categorize_transaction};
pub use finance::{Category, MIN_AMOUNT, Transaction, TxnType};
pub use summary::{CategorySummary, DailySummary, MonthlySummary, Summary};
pub use time::{Clock, FixedClock, SystemClock};
