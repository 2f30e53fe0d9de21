//! Distance-to-center parsing.
//!
//! Listing cards render distances as free text (`"A 2,5 km del centro"`).
//! [`extract_distance_token`] isolates the `<number> <unit>` token and
//! [`parse_distance_km`] converts it to kilometers.

use std::sync::LazyLock;

use regex::Regex;

use crate::ParseError;

/// A numeral with an optional comma decimal, one whitespace character and a
/// one- or two-letter unit.
static DISTANCE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+,?\d*\s\w{1,2}").unwrap_or_else(|_| unreachable!()));

/// Returns the first `<number> <unit>` token in `raw`, if any.
#[must_use]
pub fn extract_distance_token(raw: &str) -> Option<&str> {
    DISTANCE_TOKEN.find(raw).map(|m| m.as_str())
}

/// Converts a `<number> <unit>` distance into kilometers.
///
/// `km` values are returned as-is and `m` values are divided by 1000. Any
/// other unit yields `Ok(None)`.
///
/// # Errors
///
/// Returns [`ParseError::MissingUnit`] if there is no unit token and
/// [`ParseError::InvalidNumber`] if a `km`/`m` magnitude is not numeric.
pub fn parse_distance_km(text: &str) -> Result<Option<f64>, ParseError> {
    let normalized = text.replace(',', ".");
    let mut tokens = normalized.split_whitespace();

    let Some(magnitude) = tokens.next() else {
        return Err(ParseError::InvalidNumber {
            input: text.to_owned(),
        });
    };
    let Some(unit) = tokens.next() else {
        return Err(ParseError::MissingUnit {
            input: text.to_owned(),
        });
    };

    let divisor = match unit {
        "km" => 1.0,
        "m" => 1000.0,
        other => {
            log::debug!("Unrecognized distance unit '{other}' in '{text}'");
            return Ok(None);
        }
    };

    let value = magnitude
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            input: magnitude.to_owned(),
        })?;

    Ok(Some(value / divisor))
}
