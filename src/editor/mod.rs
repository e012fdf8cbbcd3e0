//! The budget being edited: one user's categories for one month, held in
//! memory and written back through a debounced auto-save.

use rust_decimal::Decimal;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::models::{AmountField, BudgetCategory, BudgetDocument, Month};
use crate::schedule::Debouncer;
use crate::storage::Storage;
use crate::store::LocalStore;
use crate::util::parse_amount;

pub(crate) const PAGE_SIZE: usize = 8;

/// A snapshot waiting to be written.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingSave {
    month: Month,
    year: i32,
    categories: Vec<BudgetCategory>,
}

pub(crate) struct BudgetEditor {
    user_id: String,
    month: Month,
    year: i32,
    categories: Vec<BudgetCategory>,
    autosave: Debouncer<PendingSave>,
}

impl BudgetEditor {
    /// Load the stored budget for the period, or seed the default
    /// categories. Either way a save is scheduled, so a month that is
    /// opened and left alone still has its `last_modified` refreshed.
    pub(crate) fn open<S: Storage>(
        store: &LocalStore<S>,
        user_id: &str,
        month: Month,
        year: i32,
        quiet: Duration,
        now: Instant,
    ) -> Self {
        let mut editor = Self {
            user_id: user_id.to_string(),
            month,
            year,
            categories: Vec::new(),
            autosave: Debouncer::new(quiet),
        };
        editor.load(store, now);
        editor
    }

    fn load<S: Storage>(&mut self, store: &LocalStore<S>, now: Instant) {
        self.categories = match store.get_budget(&self.user_id, self.month, self.year) {
            Some(doc) => doc.categories,
            None => BudgetCategory::defaults(1),
        };
        self.schedule_save(now);
    }

    /// Move to another month, writing any edits still waiting on the
    /// previous one first.
    pub(crate) fn switch_period<S: Storage>(
        &mut self,
        store: &mut LocalStore<S>,
        month: Month,
        year: i32,
        now: Instant,
    ) {
        self.flush(store);
        self.month = month;
        self.year = year;
        self.load(store, now);
    }

    pub(crate) fn period(&self) -> (Month, i32) {
        (self.month, self.year)
    }

    pub(crate) fn categories(&self) -> &[BudgetCategory] {
        &self.categories
    }

    /// Append a zeroed category. Blank names are ignored.
    pub(crate) fn add_category(&mut self, name: &str, now: Instant) -> Option<i64> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let id = self.next_id();
        self.categories
            .push(BudgetCategory::new(id, name.to_string()));
        self.schedule_save(now);
        Some(id)
    }

    /// Set an amount from raw user input; unreadable input counts as zero.
    pub(crate) fn update_field(
        &mut self,
        id: i64,
        field: AmountField,
        raw: &str,
        now: Instant,
    ) -> bool {
        let Some(category) = self.categories.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        category.set_amount(field, parse_amount(raw));
        self.schedule_save(now);
        true
    }

    pub(crate) fn delete_category(&mut self, id: i64, now: Instant) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != id);
        if self.categories.len() == before {
            return false;
        }
        self.schedule_save(now);
        true
    }

    /// Categories whose name contains `query`, ignoring case.
    pub(crate) fn search(&self, query: &str) -> Vec<&BudgetCategory> {
        let query = query.to_lowercase();
        self.categories
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&query))
            .collect()
    }

    /// One page (1-based) of the search results, plus the page count.
    pub(crate) fn page(&self, query: &str, page: usize) -> (Vec<&BudgetCategory>, usize) {
        let matches = self.search(query);
        let total_pages = matches.len().div_ceil(PAGE_SIZE);
        let start = page.saturating_sub(1) * PAGE_SIZE;
        let rows = matches.into_iter().skip(start).take(PAGE_SIZE).collect();
        (rows, total_pages)
    }

    /// (budgeted, spent, remaining) across all categories.
    pub(crate) fn totals(&self) -> (Decimal, Decimal, Decimal) {
        let budgeted = BudgetCategory::total(&self.categories, AmountField::Budgeted);
        let spent = BudgetCategory::total(&self.categories, AmountField::Spent);
        (budgeted, spent, budgeted.saturating_sub(spent))
    }

    pub(crate) fn has_pending_save(&self) -> bool {
        self.autosave.is_pending()
    }

    pub(crate) fn save_deadline(&self) -> Option<Instant> {
        self.autosave.deadline()
    }

    /// Write the pending save if its quiet period is over at `now`.
    pub(crate) fn tick<S: Storage>(&mut self, store: &mut LocalStore<S>, now: Instant) -> bool {
        match self.autosave.poll(now) {
            Some(pending) => {
                self.write(store, pending);
                true
            }
            None => false,
        }
    }

    /// Write the pending save right away.
    pub(crate) fn flush<S: Storage>(&mut self, store: &mut LocalStore<S>) -> bool {
        match self.autosave.flush() {
            Some(pending) => {
                self.write(store, pending);
                true
            }
            None => false,
        }
    }

    /// Tear down the editor. A save still waiting is dropped; returns
    /// whether there was one.
    pub(crate) fn close(mut self) -> bool {
        let dropped = self.autosave.cancel();
        if dropped {
            debug!(user_id = %self.user_id, "discarded unsaved budget edits");
        }
        dropped
    }

    fn schedule_save(&mut self, now: Instant) {
        let pending = PendingSave {
            month: self.month,
            year: self.year,
            categories: self.categories.clone(),
        };
        self.autosave.trigger(now, pending);
    }

    fn write<S: Storage>(&self, store: &mut LocalStore<S>, pending: PendingSave) {
        let doc = BudgetDocument::new(pending.month, pending.year, pending.categories);
        store.save_budget(&self.user_id, pending.month, pending.year, doc);
    }

    fn next_id(&self) -> i64 {
        self.categories.iter().map(|c| c.id).max().unwrap_or(0) + 1
    }
}

#[cfg(test)]
mod tests;
