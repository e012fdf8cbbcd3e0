use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Names seeded into every freshly opened budget.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Housing",
    "Transportation",
    "Food",
    "Utilities",
    "Entertainment",
    "Savings",
];

/// The two amounts a user edits on a category row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountField {
    Budgeted,
    Spent,
}

impl AmountField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Budgeted => "budgeted",
            Self::Spent => "spent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "budgeted" | "budget" | "b" => Some(Self::Budgeted),
            "spent" | "s" => Some(Self::Spent),
            _ => None,
        }
    }
}

impl std::fmt::Display for AmountField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub budgeted: Decimal,
    #[serde(default)]
    pub spent: Decimal,
    /// Always `budgeted - spent`; never edited directly.
    #[serde(default)]
    pub remaining: Decimal,
}

impl BudgetCategory {
    pub fn new(id: i64, name: String) -> Self {
        Self {
            id,
            name,
            budgeted: Decimal::ZERO,
            spent: Decimal::ZERO,
            remaining: Decimal::ZERO,
        }
    }

    pub fn with_amounts(id: i64, name: String, budgeted: Decimal, spent: Decimal) -> Self {
        Self {
            id,
            name,
            budgeted,
            spent,
            remaining: budgeted.saturating_sub(spent),
        }
    }

    /// The six default categories with ids `first_id..first_id + 6`.
    pub fn defaults(first_id: i64) -> Vec<Self> {
        DEFAULT_CATEGORIES
            .iter()
            .zip(first_id..)
            .map(|(name, id)| Self::new(id, (*name).to_string()))
            .collect()
    }

    pub fn set_amount(&mut self, field: AmountField, value: Decimal) {
        match field {
            AmountField::Budgeted => self.budgeted = value,
            AmountField::Spent => self.spent = value,
        }
        self.remaining = self.budgeted.saturating_sub(self.spent);
    }

    pub fn amount(&self, field: AmountField) -> Decimal {
        match field {
            AmountField::Budgeted => self.budgeted,
            AmountField::Spent => self.spent,
        }
    }

    /// Sum of one amount across `categories`, saturating at the `Decimal`
    /// bounds instead of overflowing.
    pub fn total<'a>(
        categories: impl IntoIterator<Item = &'a BudgetCategory>,
        field: AmountField,
    ) -> Decimal {
        categories
            .into_iter()
            .map(|c| c.amount(field))
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub fn find_by_id(categories: &[BudgetCategory], id: i64) -> Option<&BudgetCategory> {
        categories.iter().find(|c| c.id == id)
    }
}

impl std::fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
