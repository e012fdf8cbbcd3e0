#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::{Duration, Instant};

use super::*;
use crate::storage::MemoryStorage;
use crate::util::{max_amount, parse_iso};

const QUIET: Duration = Duration::from_millis(1000);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn new_store() -> LocalStore<MemoryStorage> {
    LocalStore::new(MemoryStorage::new())
}

fn open(store: &LocalStore<MemoryStorage>, t0: Instant) -> BudgetEditor {
    BudgetEditor::open(store, "u1", Month::January, 2025, QUIET, t0)
}

/// Open a fresh budget and let its seeding save go through.
fn open_saved(store: &mut LocalStore<MemoryStorage>, t0: Instant) -> BudgetEditor {
    let mut editor = open(store, t0);
    assert!(editor.tick(store, t0 + QUIET));
    editor
}

// ── Loading ───────────────────────────────────────────────────

#[test]
fn test_open_seeds_defaults() {
    let store = new_store();
    let editor = open(&store, Instant::now());
    let names: Vec<&str> = editor.categories().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Housing", "Transportation", "Food", "Utilities", "Entertainment", "Savings"]
    );
    assert!(editor.categories().iter().all(|c| c.remaining == Decimal::ZERO));
    assert!(editor.has_pending_save());
    assert_eq!(editor.period(), (Month::January, 2025));
}

#[test]
fn test_seeded_budget_saved_after_quiet_period() {
    let mut store = new_store();
    let t0 = Instant::now();
    let mut editor = open(&store, t0);

    assert!(!editor.tick(&mut store, t0 + ms(999)));
    assert!(store.get_budget("u1", Month::January, 2025).is_none());

    assert!(editor.tick(&mut store, t0 + ms(1000)));
    let doc = store.get_budget("u1", Month::January, 2025).unwrap();
    assert_eq!(doc.categories.len(), 6);
}

#[test]
fn test_open_existing_budget_refreshes_last_modified() {
    let mut store = new_store();
    let t0 = Instant::now();
    open_saved(&mut store, t0).close();
    let first = store.get_budget("u1", Month::January, 2025).unwrap();

    std::thread::sleep(ms(5));
    let mut editor = open(&store, t0);
    assert_eq!(editor.categories(), first.categories.as_slice());
    assert!(editor.has_pending_save());
    assert!(editor.tick(&mut store, t0 + QUIET));

    let refreshed = store.get_budget("u1", Month::January, 2025).unwrap();
    assert_eq!(refreshed.categories, first.categories);
    assert!(parse_iso(&refreshed.last_modified) > parse_iso(&first.last_modified));
}

#[test]
fn test_reopened_month_moves_to_top_of_summary() {
    let mut store = new_store();
    let t0 = Instant::now();
    open_saved(&mut store, t0).close();
    std::thread::sleep(ms(5));
    let mut february = BudgetEditor::open(&store, "u1", Month::February, 2025, QUIET, t0);
    assert!(february.tick(&mut store, t0 + QUIET));
    assert_eq!(store.budget_summary("u1")[0].key, "FEBRUARY-2025");

    std::thread::sleep(ms(5));
    let mut january = open(&store, t0);
    assert!(january.tick(&mut store, t0 + QUIET));
    assert_eq!(store.budget_summary("u1")[0].key, "JANUARY-2025");
}

#[test]
fn test_close_right_after_open_leaves_stored_budget_untouched() {
    let mut store = new_store();
    let t0 = Instant::now();
    open_saved(&mut store, t0).close();
    let before = store.get_budget("u1", Month::January, 2025).unwrap();

    assert!(open(&store, t0).close());
    assert_eq!(store.get_budget("u1", Month::January, 2025).unwrap(), before);
}

// ── Category edits ────────────────────────────────────────────

#[test]
fn test_add_category() {
    let mut store = new_store();
    let t0 = Instant::now();
    let mut editor = open_saved(&mut store, t0);

    let id = editor.add_category("  Gym  ", t0).unwrap();
    assert_eq!(id, 7);
    let added = editor.categories().last().unwrap();
    assert_eq!(added.name, "Gym");
    assert_eq!(added.budgeted, Decimal::ZERO);
    assert_eq!(added.spent, Decimal::ZERO);
    assert_eq!(added.remaining, Decimal::ZERO);
}

#[test]
fn test_add_blank_category_ignored() {
    let mut store = new_store();
    let t0 = Instant::now();
    let mut editor = open_saved(&mut store, t0);

    assert!(editor.add_category("", t0).is_none());
    assert!(editor.add_category("   \t", t0).is_none());
    assert_eq!(editor.categories().len(), 6);
    assert!(!editor.has_pending_save());
}

#[test]
fn test_add_category_ids_stay_unique_after_delete() {
    let mut store = new_store();
    let t0 = Instant::now();
    let mut editor = open_saved(&mut store, t0);
    editor.delete_category(6, t0);
    let id = editor.add_category("Pets", t0).unwrap();
    assert!(editor.categories().iter().filter(|c| c.id == id).count() == 1);
}

#[test]
fn test_update_spent_recomputes_remaining() {
    let mut store = new_store();
    let t0 = Instant::now();
    let mut editor = open_saved(&mut store, t0);

    assert!(editor.update_field(1, AmountField::Budgeted, "1200", t0));
    assert!(editor.update_field(1, AmountField::Spent, "1150.50", t0));
    let housing = &editor.categories()[0];
    assert_eq!(housing.remaining, dec!(49.50));
    assert_eq!(housing.remaining, housing.budgeted - housing.spent);

    assert!(editor.update_field(1, AmountField::Budgeted, "1000", t0));
    assert_eq!(editor.categories()[0].remaining, dec!(-150.50));
}

#[test]
fn test_update_non_numeric_is_zero() {
    let mut store = new_store();
    let t0 = Instant::now();
    let mut editor = open_saved(&mut store, t0);

    editor.update_field(2, AmountField::Budgeted, "400", t0);
    editor.update_field(2, AmountField::Budgeted, "lots", t0);
    let transport = &editor.categories()[1];
    assert_eq!(transport.budgeted, Decimal::ZERO);
    assert_eq!(transport.remaining, Decimal::ZERO);
}

#[test]
fn test_update_huge_amounts_keep_totals_in_range() {
    let mut store = new_store();
    let t0 = Instant::now();
    let mut editor = open_saved(&mut store, t0);
    let huge = "50000000000000000000000000000";

    assert!(editor.update_field(1, AmountField::Budgeted, huge, t0));
    assert!(editor.update_field(2, AmountField::Budgeted, huge, t0));
    assert!(editor.update_field(3, AmountField::Spent, &format!("-{huge}"), t0));
    assert!(editor.flush(&mut store));

    let limit = max_amount();
    assert_eq!(editor.categories()[0].budgeted, limit);
    assert_eq!(editor.categories()[2].remaining, limit);
    let (budgeted, spent, remaining) = editor.totals();
    assert_eq!(budgeted, limit * dec!(2));
    assert_eq!(spent, -limit);
    assert_eq!(remaining, limit * dec!(3));

    let summary = store.budget_summary("u1");
    assert_eq!(summary[0].total_budgeted, budgeted);
    assert_eq!(summary[0].remaining, remaining);
}

#[test]
fn test_update_unknown_category() {
    let mut store = new_store();
    let t0 = Instant::now();
    let mut editor = open_saved(&mut store, t0);
    assert!(!editor.update_field(404, AmountField::Spent, "10", t0));
    assert!(!editor.has_pending_save());
}

#[test]
fn test_delete_category() {
    let mut store = new_store();
    let t0 = Instant::now();
    let mut editor = open_saved(&mut store, t0);

    assert!(editor.delete_category(3, t0));
    assert!(editor.categories().iter().all(|c| c.id != 3));
    assert_eq!(editor.categories().len(), 5);
    assert!(!editor.delete_category(3, t0));
}

#[test]
fn test_totals() {
    let mut store = new_store();
    let t0 = Instant::now();
    let mut editor = open_saved(&mut store, t0);
    editor.update_field(1, AmountField::Budgeted, "1000", t0);
    editor.update_field(1, AmountField::Spent, "900", t0);
    editor.update_field(3, AmountField::Budgeted, "500", t0);
    editor.update_field(3, AmountField::Spent, "650", t0);
    assert_eq!(editor.totals(), (dec!(1500), dec!(1550), dec!(-50)));
}

// ── Search / paging ───────────────────────────────────────────

#[test]
fn test_search_case_insensitive() {
    let store = new_store();
    let editor = open(&store, Instant::now());
    let hits: Vec<&str> = editor.search("TI").iter().map(|c| c.name.as_str()).collect();
    assert_eq!(hits, vec!["Transportation", "Utilities"]);
    assert_eq!(editor.search("").len(), 6);
    assert!(editor.search("zzz").is_empty());
}

#[test]
fn test_paging() {
    let mut store = new_store();
    let t0 = Instant::now();
    let mut editor = open_saved(&mut store, t0);
    for i in 0..5 {
        editor.add_category(&format!("Extra {i}"), t0);
    }

    let (first, pages) = editor.page("", 1);
    assert_eq!(pages, 2);
    assert_eq!(first.len(), PAGE_SIZE);
    let (second, _) = editor.page("", 2);
    assert_eq!(second.len(), 3);
    assert_eq!(second[0].name, "Extra 2");
    let (third, _) = editor.page("", 3);
    assert!(third.is_empty());

    let (none, pages) = editor.page("nothing matches", 1);
    assert!(none.is_empty());
    assert_eq!(pages, 0);
}

// ── Auto-save ─────────────────────────────────────────────────

#[test]
fn test_burst_of_edits_writes_once_with_last_state() {
    let mut store = new_store();
    let t0 = Instant::now();
    let mut editor = open_saved(&mut store, t0);

    let t1 = t0 + ms(5000);
    editor.update_field(1, AmountField::Budgeted, "100", t1);
    editor.update_field(1, AmountField::Budgeted, "200", t1 + ms(400));
    editor.update_field(1, AmountField::Budgeted, "300", t1 + ms(800));

    // The first edit's window has passed, but later edits pushed it back
    assert!(!editor.tick(&mut store, t1 + ms(1000)));
    let stored = store.get_budget("u1", Month::January, 2025).unwrap();
    assert_eq!(stored.categories[0].budgeted, Decimal::ZERO);

    assert_eq!(editor.save_deadline(), Some(t1 + ms(1800)));
    assert!(editor.tick(&mut store, t1 + ms(1800)));
    let stored = store.get_budget("u1", Month::January, 2025).unwrap();
    assert_eq!(stored.categories[0].budgeted, dec!(300));
    assert_eq!(stored.categories[0].remaining, dec!(300));

    assert!(!editor.tick(&mut store, t1 + ms(10_000)));
}

#[test]
fn test_close_cancels_pending_save() {
    let mut store = new_store();
    let t0 = Instant::now();
    let mut editor = open_saved(&mut store, t0);

    editor.add_category("Unsaved", t0 + ms(10));
    assert!(editor.close());

    let stored = store.get_budget("u1", Month::January, 2025).unwrap();
    assert_eq!(stored.categories.len(), 6);
}

#[test]
fn test_close_without_pending_save() {
    let mut store = new_store();
    let editor = open_saved(&mut store, Instant::now());
    assert!(!editor.close());
}

#[test]
fn test_flush_writes_immediately() {
    let mut store = new_store();
    let t0 = Instant::now();
    let mut editor = open(&store, t0);
    editor.add_category("Gym", t0);

    assert!(editor.flush(&mut store));
    assert!(!editor.has_pending_save());
    let stored = store.get_budget("u1", Month::January, 2025).unwrap();
    assert_eq!(stored.categories.len(), 7);
    assert!(!editor.flush(&mut store));
}

#[test]
fn test_deleting_everything_is_saved() {
    let mut store = new_store();
    let t0 = Instant::now();
    let mut editor = open_saved(&mut store, t0);
    for id in 1..=6 {
        editor.delete_category(id, t0);
    }
    editor.flush(&mut store);
    let stored = store.get_budget("u1", Month::January, 2025).unwrap();
    assert!(stored.categories.is_empty());

    // Reopening an empty stored budget does not reseed it
    let editor = open(&store, t0);
    assert!(editor.categories().is_empty());
}

#[test]
fn test_switch_period_saves_previous_month() {
    let mut store = new_store();
    let t0 = Instant::now();
    let mut editor = open_saved(&mut store, t0);

    editor.update_field(1, AmountField::Spent, "75", t0);
    editor.switch_period(&mut store, Month::February, 2025, t0 + ms(100));

    let january = store.get_budget("u1", Month::January, 2025).unwrap();
    assert_eq!(january.categories[0].spent, dec!(75));

    // February starts from defaults and saves itself later
    assert_eq!(editor.period(), (Month::February, 2025));
    assert_eq!(editor.categories()[0].spent, Decimal::ZERO);
    assert!(store.get_budget("u1", Month::February, 2025).is_none());
    assert!(editor.tick(&mut store, t0 + ms(1100)));
    assert!(store.get_budget("u1", Month::February, 2025).is_some());
}
