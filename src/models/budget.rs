use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AmountField, BudgetCategory, Month};

/// Storage key of a budget within a user's bucket, e.g. `"JANUARY-2025"`.
pub fn budget_key(month: Month, year: i32) -> String {
    format!("{month}-{year}")
}

/// One user's categories for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetDocument {
    #[serde(default)]
    pub categories: Vec<BudgetCategory>,
    #[serde(default)]
    pub last_modified: String,
    pub month: Month,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl BudgetDocument {
    pub fn new(month: Month, year: i32, categories: Vec<BudgetCategory>) -> Self {
        Self {
            categories,
            last_modified: String::new(),
            month,
            year,
            created_at: None,
        }
    }

    pub fn key(&self) -> String {
        budget_key(self.month, self.year)
    }

    pub fn total_budgeted(&self) -> Decimal {
        BudgetCategory::total(&self.categories, AmountField::Budgeted)
    }

    pub fn total_spent(&self) -> Decimal {
        BudgetCategory::total(&self.categories, AmountField::Spent)
    }

    pub fn total_remaining(&self) -> Decimal {
        self.total_budgeted().saturating_sub(self.total_spent())
    }
}

/// Aggregate view of one stored budget.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSummary {
    pub key: String,
    pub month: Month,
    pub year: i32,
    pub total_budgeted: Decimal,
    pub total_spent: Decimal,
    pub remaining: Decimal,
    pub last_modified: String,
    pub categories_count: usize,
}

impl BudgetSummary {
    pub fn from_document(key: &str, doc: &BudgetDocument) -> Self {
        let total_budgeted = doc.total_budgeted();
        let total_spent = doc.total_spent();
        Self {
            key: key.to_string(),
            month: doc.month,
            year: doc.year,
            total_budgeted,
            total_spent,
            remaining: total_budgeted.saturating_sub(total_spent),
            last_modified: doc.last_modified.clone(),
            categories_count: doc.categories.len(),
        }
    }
}
