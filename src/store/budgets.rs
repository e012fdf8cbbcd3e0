use rand::Rng;
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::models::{budget_key, BudgetCategory, BudgetDocument, BudgetSummary, Month};
use crate::storage::Storage;
use crate::util::{now_iso, parse_iso};

use super::accounts::demo_accounts;
use super::{LocalStore, BUDGETS_KEY};

/// `"MONTH-YEAR"` → document, for one user.
pub(crate) type UserBudgets = BTreeMap<String, BudgetDocument>;

/// user id → that user's budgets.
type BudgetBook = BTreeMap<String, UserBudgets>;

/// (name, budgeted, spent) before randomization.
const SAMPLE_CATEGORIES: [(&str, i64, i64); 8] = [
    ("Housing", 1200, 1150),
    ("Transportation", 400, 380),
    ("Food", 600, 580),
    ("Utilities", 200, 195),
    ("Entertainment", 300, 250),
    ("Savings", 500, 500),
    ("Healthcare", 150, 75),
    ("Shopping", 200, 180),
];

impl<S: Storage> LocalStore<S> {
    fn budget_book(&self) -> BudgetBook {
        self.read_blob(BUDGETS_KEY).unwrap_or_default()
    }

    pub(crate) fn user_budgets(&self, user_id: &str) -> UserBudgets {
        self.budget_book().remove(user_id).unwrap_or_default()
    }

    pub(crate) fn get_budget(&self, user_id: &str, month: Month, year: i32) -> Option<BudgetDocument> {
        self.user_budgets(user_id).remove(&budget_key(month, year))
    }

    /// Replace the stored document for `(user, month, year)` with `doc`,
    /// stamping `last_modified` and the key's month/year onto it.
    pub(crate) fn save_budget(
        &mut self,
        user_id: &str,
        month: Month,
        year: i32,
        doc: BudgetDocument,
    ) -> BudgetDocument {
        let mut book = self.budget_book();
        let doc = BudgetDocument {
            last_modified: now_iso(),
            month,
            year,
            ..doc
        };
        book.entry(user_id.to_string())
            .or_default()
            .insert(budget_key(month, year), doc.clone());
        self.write_blob(BUDGETS_KEY, &book);
        debug!(user_id, key = %doc.key(), categories = doc.categories.len(), "saved budget");
        doc
    }

    /// Always `true`; deleting a budget that does not exist is a no-op.
    pub(crate) fn delete_budget(&mut self, user_id: &str, month: Month, year: i32) -> bool {
        let mut book = self.budget_book();
        let removed = book
            .get_mut(user_id)
            .and_then(|budgets| budgets.remove(&budget_key(month, year)))
            .is_some();
        if removed {
            self.write_blob(BUDGETS_KEY, &book);
            debug!(user_id, %month, year, "deleted budget");
        }
        true
    }

    /// Totals for each of the user's budgets, most recently modified first.
    pub(crate) fn budget_summary(&self, user_id: &str) -> Vec<BudgetSummary> {
        let mut summaries: Vec<BudgetSummary> = self
            .user_budgets(user_id)
            .iter()
            .map(|(key, doc)| BudgetSummary::from_document(key, doc))
            .collect();
        // Unreadable timestamps sort last
        summaries.sort_by_key(|s| Reverse(parse_iso(&s.last_modified)));
        summaries
    }

    /// Give every existing demo account a randomized budget for the current
    /// month. Returns how many budgets were written.
    pub(crate) fn create_sample_budgets(&mut self) -> usize {
        let (month, year) = Month::current();
        let mut rng = rand::thread_rng();
        let users = self.users();
        let mut written = 0;

        for demo in demo_accounts() {
            let Some(user) = users.iter().find(|u| u.email_matches(&demo.email)) else {
                continue;
            };
            let categories = SAMPLE_CATEGORIES
                .iter()
                .zip(1..)
                .map(|(&(name, budgeted, spent), id)| {
                    let budgeted = jitter(&mut rng, budgeted, 100);
                    let spent = jitter(&mut rng, spent, 50);
                    BudgetCategory::with_amounts(id, name.to_string(), budgeted, spent)
                })
                .collect();
            let doc = BudgetDocument {
                created_at: Some(now_iso()),
                ..BudgetDocument::new(month, year, categories)
            };
            self.save_budget(&user.id, month, year, doc);
            written += 1;
        }

        info!(count = written, %month, year, "created sample budgets");
        written
    }
}

/// `base` moved by up to `spread` either way, in whole cents.
fn jitter(rng: &mut impl Rng, base: i64, spread: i64) -> Decimal {
    let cents = rng.gen_range(-spread * 100..=spread * 100);
    Decimal::new(base * 100 + cents, 2)
}
