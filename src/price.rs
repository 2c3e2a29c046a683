//! Turns the price text shown by a shop into a number that can be sorted on.
//!
//! Parsing is lenient on purpose: promotional text mixed into the price element
//! ("£2 off", "2 for £5", "was £3.50") is tolerated and the leftmost amount wins.
//! Text without any digits parses to `0.0`, so such rows sort first.

use std::sync::LazyLock;

use regex::Regex;

/// Whole pound amounts: `£2`, `£2.99`, `2.99`, or a bare integer followed by whitespace.
static POUND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"£(\d+(?:\.\d{2})?)|(\d+\.\d{2})|(\d+)\s").expect("valid pound regex")
});

/// Any run of digits, read as pence.
static PENNY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid penny regex"));

/// Parses a raw price string into pounds.
///
/// The pound pattern is tried first, then the penny pattern (`"65"` and `"65p"`
/// become `0.65`). Both search for the first match anywhere in the string.
pub fn parse_price(raw: &str) -> f64 {
    if let Some(captures) = POUND_PATTERN.captures(raw)
        && let Some(amount) = captures
            .get(1)
            .or_else(|| captures.get(2))
            .or_else(|| captures.get(3))
    {
        return amount.as_str().parse().unwrap_or(0.0);
    }

    if let Some(pence) = PENNY_PATTERN.find(raw) {
        return format!("0.{}", pence.as_str()).parse().unwrap_or(0.0);
    }

    0.0
}
