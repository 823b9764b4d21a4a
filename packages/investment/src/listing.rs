//! Prefills parcel inputs from a listing's free-text description.
//!
//! Listings are scraped Romanian real-estate ads. The land area shows up
//! as `"<n> mp"` (square meters, with `.` as thousands separator) and the
//! street address, when present, follows an `Adresa postala:` label inside
//! HTML markup.

use std::sync::LazyLock;

use regex::Regex;

/// First integer immediately followed by `mp`.
static AREA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+)\s*mp\b").expect("valid regex"));

/// Postal address label up to the next HTML tag.
static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Adresa postala:\s*([^<]+)").expect("valid regex"));

/// Extracts the land area in square meters from a listing description.
///
/// Dots between digits are thousands separators (`"1.500 mp"` is 1500).
/// Returns `None` when no `mp` figure is present.
#[must_use]
pub fn extract_area_square_meters(text: &str) -> Option<f64> {
    let cleaned = strip_digit_group_dots(text);
    let captures = AREA_RE.captures(&cleaned)?;
    let digits = captures.get(1)?.as_str();
    let area = digits.parse::<u64>().ok()?;

    #[allow(clippy::cast_precision_loss)]
    Some(area as f64)
}

/// Extracts the postal address following `Adresa postala:`.
#[must_use]
pub fn extract_postal_address(text: &str) -> Option<String> {
    let captures = ADDRESS_RE.captures(text)?;
    let address = captures.get(1)?.as_str().trim();
    if address.is_empty() {
        None
    } else {
        Some(address.to_string())
    }
}

/// Removes `.` characters that sit between two digits.
fn strip_digit_group_dots(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        let between_digits = c == '.'
            && i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).is_some_and(char::is_ascii_digit);
        if !between_digits {
            out.push(c);
        }
    }

    out
}
