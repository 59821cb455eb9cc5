//! Stateless cell-text parsers.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::FieldError;

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z]{3}) (\w+), (\w+)").expect("date pattern is a valid regex")
});

/// Upper bound of stored ids and market values (signed 64-bit columns).
const MAX_STORED: u64 = i64::MAX as u64;

/// Upper bound of stored shirt numbers (signed 32-bit column).
const MAX_SHIRT_NUMBER: u32 = i32::MAX as u32;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Shirt number from the number badge text, e.g. `"7"`.
pub fn parse_shirt_number(text: &str) -> Result<u32, FieldError> {
    let text = text.trim();
    let number: u32 = text
        .parse()
        .map_err(|_| FieldError::InvalidInteger(text.to_string()))?;
    if number > MAX_SHIRT_NUMBER {
        return Err(FieldError::ValueOutOfRange(text.to_string()));
    }
    Ok(number)
}

/// Player id from the final path segment of a profile link.
///
/// `"/bukayo-saka/profil/spieler/433177"` → `433177`
pub fn parse_player_id(href: &str) -> Result<u64, FieldError> {
    let path = href.split(['?', '#']).next().unwrap_or_default();
    let segment = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    let id: u64 = segment
        .parse()
        .map_err(|_| FieldError::InvalidInteger(segment.to_string()))?;
    if id == 0 {
        return Err(FieldError::ZeroIdentifier);
    }
    if id > MAX_STORED {
        return Err(FieldError::ValueOutOfRange(segment.to_string()));
    }
    Ok(id)
}

/// Strips line breaks and non-breaking spaces left over from the markup.
pub fn clean_player_name(raw: &str) -> String {
    raw.replace("&nbsp;", " ")
        .replace(['\n', '\r', '\u{a0}'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Date of birth from text like `"May 14, 1998 (25)"`.
///
/// Exactly one `<Mon> <day>, <year>` must be present; the month is matched
/// case-sensitively against English three-letter abbreviations.
pub fn parse_date_of_birth(text: &str) -> Result<NaiveDate, FieldError> {
    let mut matches = DATE_PATTERN.captures_iter(text);
    let caps = matches
        .next()
        .ok_or_else(|| FieldError::DatePatternNotFound(text.trim().to_string()))?;
    if matches.next().is_some() {
        return Err(FieldError::AmbiguousDate(text.trim().to_string()));
    }

    let day: u32 = caps[2]
        .parse()
        .map_err(|_| FieldError::InvalidInteger(caps[2].to_string()))?;
    let year: i32 = caps[3]
        .parse()
        .map_err(|_| FieldError::InvalidInteger(caps[3].to_string()))?;
    let month = MONTHS
        .iter()
        .position(|m| *m == &caps[1])
        .map(|i| i as u32 + 1)
        .ok_or_else(|| FieldError::UnknownMonth(caps[1].to_string()))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or(FieldError::InvalidDate { year, month, day })
}

/// Market value in base units from abbreviated notation, e.g. `"€4.50m"`.
///
/// The first character is the currency symbol, the last one the multiplier
/// (`k`, `m` or `b`). The scaled amount is rounded to the nearest unit and
/// must fit a signed 64-bit column.
pub fn parse_market_value(text: &str) -> Result<u64, FieldError> {
    let text = text.trim();
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < 3 {
        return Err(FieldError::ValueTooShort(text.to_string()));
    }

    let multiplier = match chars[chars.len() - 1] {
        'k' => 1e3,
        'm' => 1e6,
        'b' => 1e9,
        other => return Err(FieldError::UnknownMultiplier(other)),
    };

    let amount: String = chars[1..chars.len() - 1].iter().collect();
    let value: f64 = amount
        .parse()
        .map_err(|_| FieldError::InvalidDecimal(amount.clone()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(FieldError::InvalidDecimal(amount));
    }

    // 2^63 is exact in f64; anything at or above it cannot be stored.
    let scaled = (value * multiplier).round();
    if scaled >= MAX_STORED as f64 {
        return Err(FieldError::ValueOutOfRange(text.to_string()));
    }
    Ok(scaled as u64)
}
