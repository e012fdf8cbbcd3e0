use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Dollar amount with comma grouping and cents, e.g. `-$1,234.50`.
pub(crate) fn format_amount(val: Decimal) -> String {
    let text = format!("{:.2}", val.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if val < Decimal::ZERO { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// At most `max` characters; a cut string ends in `…`.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.char_indices().nth(max).is_none() {
        return s.to_string();
    }
    match max.checked_sub(1) {
        Some(keep) => {
            let end = s.char_indices().nth(keep).map_or(0, |(i, _)| i);
            format!("{}…", &s[..end])
        }
        None => String::new(),
    }
}

/// Largest magnitude an entered amount can have. Anything bigger is clamped
/// so sums across a budget stay in range.
pub(crate) fn max_amount() -> Decimal {
    Decimal::new(99_999_999_999_999_999, 2)
}

/// Read the leading number of user input the way a lenient float parser
/// would: `"12.5abc"` is 12.5, `" 40"` is 40, anything without a leading
/// number is zero. The result is clamped to [`max_amount`] either way.
pub(crate) fn parse_amount(input: &str) -> Decimal {
    let s = input.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => ("-", &s[1..]),
        Some(b'+') => ("", &s[1..]),
        _ => ("", s),
    };

    let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    let int_part = &rest[..int_len];
    let frac_part = rest[int_len..]
        .strip_prefix('.')
        .map(|r| &r[..r.bytes().take_while(u8::is_ascii_digit).count()])
        .unwrap_or("");

    if int_part.is_empty() && frac_part.is_empty() {
        return Decimal::ZERO;
    }

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let normalized = if frac_part.is_empty() {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}.{frac_part}")
    };
    let limit = max_amount();
    match Decimal::from_str(&normalized) {
        Ok(value) => value.clamp(-limit, limit),
        // Only digits reach here, so a failure means too many of them
        Err(_) if sign == "-" => -limit,
        Err(_) => limit,
    }
}

/// Current time as an ISO 8601 UTC string with millisecond precision.
pub(crate) fn now_iso() -> String {
    iso(Utc::now())
}

pub(crate) fn iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp; `None` for anything unreadable.
pub(crate) fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
