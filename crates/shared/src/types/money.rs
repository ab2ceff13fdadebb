//! Money parsing and display.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` from the wire to the rendered cell.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

/// Display suffix. The backend works in tenge; the `₸` sign is never shown.
pub const CURRENCY_SUFFIX: &str = "KZT";

/// Group separator and currency spacing used by the Russian locale.
const NBSP: char = '\u{a0}';

/// Coerces a JSON value into an amount.
///
/// Numbers and numeric strings are accepted; anything else (null, text,
/// objects) becomes zero so one malformed record cannot poison a total.
#[must_use]
pub fn parse_amount(value: &Value) -> Decimal {
    try_parse_amount(value).unwrap_or(Decimal::ZERO)
}

/// Like [`parse_amount`], but reports unparsable values instead of zeroing them.
#[must_use]
pub fn try_parse_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(&clean_input(s)),
        _ => None,
    }
}

/// Parses an amount typed by a user or recognised from a scanned invoice.
///
/// Whitespace (including non-breaking spaces used as group separators) is
/// dropped and a decimal comma is accepted: `"1 234,50"` is `1234.50`.
/// Unparsable input is zero.
#[must_use]
pub fn parse_amount_input(input: &str) -> Decimal {
    parse_decimal(&clean_input(input)).unwrap_or(Decimal::ZERO)
}

fn clean_input(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect()
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Formats an amount the way the CRM displays money.
///
/// Russian grouping with non-breaking spaces, decimal comma, exactly two
/// fraction digits and a `KZT` suffix: `1 234 567,50 KZT`.
#[must_use]
pub fn format_kzt(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().to_string();

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (digits, String::new()),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(NBSP);
        }
        grouped.push(ch);
    }

    let frac = format!("{frac_part:0<2}");
    let sign = if negative { "-" } else { "" };

    format!("{sign}{grouped},{frac}{NBSP}{CURRENCY_SUFFIX}")
}
