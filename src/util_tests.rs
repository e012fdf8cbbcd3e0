#![allow(clippy::unwrap_used)]

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("Entertainment", 6), "Enter…");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_exact_length_kept() {
    assert_eq!(truncate("Savings", 7), "Savings");
    assert_eq!(truncate("", 0), "");
}

#[test]
fn test_truncate_unicode() {
    assert_eq!(truncate("café résumé", 5), "café…");
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_thousands() {
    assert_eq!(format_amount(dec!(1234567.89)), "$1,234,567.89");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-50)), "-$50.00");
}

#[test]
fn test_format_amount_grouping_edges() {
    assert_eq!(format_amount(dec!(999.999)), "$1,000.00");
    assert_eq!(format_amount(dec!(100000)), "$100,000.00");
    assert_eq!(format_amount(dec!(12.3)), "$12.30");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(Decimal::ZERO), "$0.00");
}

// ── parse_amount ──────────────────────────────────────────────

#[test]
fn test_parse_amount_plain() {
    assert_eq!(parse_amount("1200"), dec!(1200));
    assert_eq!(parse_amount("19.99"), dec!(19.99));
    assert_eq!(parse_amount("  40"), dec!(40));
}

#[test]
fn test_parse_amount_leading_number_wins() {
    assert_eq!(parse_amount("12.5abc"), dec!(12.5));
    assert_eq!(parse_amount("300 dollars"), dec!(300));
    assert_eq!(parse_amount("7."), dec!(7));
    assert_eq!(parse_amount(".5"), dec!(0.5));
}

#[test]
fn test_parse_amount_signs() {
    assert_eq!(parse_amount("-25"), dec!(-25));
    assert_eq!(parse_amount("+25"), dec!(25));
}

#[test]
fn test_parse_amount_non_numeric_is_zero() {
    assert_eq!(parse_amount(""), Decimal::ZERO);
    assert_eq!(parse_amount("abc"), Decimal::ZERO);
    assert_eq!(parse_amount("$100"), Decimal::ZERO);
    assert_eq!(parse_amount("-"), Decimal::ZERO);
    assert_eq!(parse_amount("."), Decimal::ZERO);
}

#[test]
fn test_parse_amount_clamps_huge_input() {
    let limit = max_amount();
    assert_eq!(limit, dec!(999999999999999.99));
    assert_eq!(parse_amount("50000000000000000000000000000"), limit);
    assert_eq!(parse_amount("-50000000000000000000000000000"), -limit);
    // Past what a Decimal can hold at all
    assert_eq!(parse_amount(&"9".repeat(40)), limit);
    assert_eq!(parse_amount("1000000000000000"), limit);
    assert_eq!(parse_amount("999999999999999.99"), limit);
    assert_eq!(parse_amount("123456789012.34"), dec!(123456789012.34));
}

// ── timestamps ────────────────────────────────────────────────

#[test]
fn test_iso_format_matches_stored_shape() {
    let at = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
    assert_eq!(iso(at), "2025-10-01T00:00:00.000Z");
}

#[test]
fn test_parse_iso_roundtrip() {
    let now = now_iso();
    let parsed = parse_iso(&now).unwrap();
    assert_eq!(iso(parsed), now);
}

#[test]
fn test_parse_iso_rejects_garbage() {
    assert!(parse_iso("").is_none());
    assert!(parse_iso("yesterday").is_none());
}
