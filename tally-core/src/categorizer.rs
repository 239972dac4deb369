//! Keyword categorizer for transaction descriptions.
//!
//! Matching is a lower-cased substring test against a fixed table of South
//! African merchant names and generic terms. Categories are tried in table
//! order and the first hit wins, so a description mentioning two merchants
//! always lands in the earlier category.

use crate::finance::Category;

/// Category → keyword table, in match order.
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::FoodAndGroceries,
        &[
            "checkers", "shoprite", "pick n pay", "woolworths", "spar", "food lover",
            "restaurant", "cafe", "mcdonalds", "kfc", "nandos", "steers", "wimpy",
            "grocery", "supermarket", "food", "dining", "takeaway",
        ],
    ),
    (
        Category::Transportation,
        &[
            "shell", "bp", "caltex", "engen", "sasol", "total", "petrol", "fuel",
            "uber", "bolt", "taxi", "parking", "gautrain", "metrobus",
            "car payment", "vehicle", "aa", "automobile",
        ],
    ),
    (
        Category::Shopping,
        &[
            "edgars", "truworths", "mr price", "foschini", "woolworths",
            "game", "makro", "builders warehouse", "pep", "ackermans",
            "takealot", "amazon", "clothing", "mall", "shopping centre",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "ster kinekor", "nu metro", "netflix", "dstv", "showmax",
            "multichoice", "cinema", "movie", "bar", "club", "entertainment",
        ],
    ),
    (
        Category::UtilitiesAndServices,
        &[
            "eskom", "city power", "municipality", "rates", "electricity",
            "water", "telkom", "vodacom", "mtn", "cell c", "rain",
            "internet", "fibre", "dstv", "insurance", "discovery",
        ],
    ),
    (
        Category::Healthcare,
        &[
            "clicks", "dis-chem", "pharmacy", "doctor", "hospital", "medical",
            "dental", "discovery health", "momentum", "medscheme", "health",
        ],
    ),
    (
        Category::BankingAndFinance,
        &[
            "fnb", "standard bank", "absa", "nedbank", "capitec",
            "bank charges", "atm", "service fee", "interest", "loan",
        ],
    ),
    (
        Category::Education,
        &[
            "school fees", "university", "wits", "uct", "stellenbosch",
            "tuition", "books", "education", "course", "training",
        ],
    ),
];

/// Terms that mark a credit as earned income.
pub const INCOME_KEYWORDS: &[&str] = &["salary", "wage", "income"];

/// Categorize a description by keyword. Never returns `Income`.
pub fn categorize(description: &str) -> Category {
    let desc = description.to_lowercase();

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| desc.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

/// Categorize with the amount in view: credits whose description names
/// salary, wage or income become `Income`; everything else goes through
/// [`categorize`].
pub fn categorize_transaction(description: &str, amount: f64) -> Category {
    if amount > 0.0 {
        let desc = description.to_lowercase();
        if INCOME_KEYWORDS.iter().any(|k| desc.contains(k)) {
            return Category::Income;
        }
    }
    categorize(description)
}
