#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Field parsers for scraped listing text.
//!
//! Each parser converts one raw text field into one typed value. Parsers
//! never panic: a value that cannot be derived is either `None` (a normal,
//! absent result) or a [`ParseError`] when the text does not have the shape
//! the column promises.

pub mod distance;
pub mod rating;

pub use distance::{extract_distance_token, parse_distance_km};
pub use rating::{RatingSummary, parse_rating_with_count};

use std::sync::LazyLock;

use regex::Regex;

/// Errors raised when a field does not have the expected numeric shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The text is not a number after cleanup.
    #[error("invalid number '{input}'")]
    InvalidNumber {
        /// The text that failed to parse, after cleanup.
        input: String,
    },

    /// A distance had a magnitude but no unit token.
    #[error("missing unit in distance '{input}'")]
    MissingUnit {
        /// The distance text as given.
        input: String,
    },
}

/// Currency symbols stripped from prices.
const CURRENCY_SYMBOLS: &[char] = &['€', '$', '£'];

/// A word followed by whitespace, as in `"Ubicación 9,2"`.
static LEADING_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+\s").unwrap_or_else(|_| unreachable!()));

/// Parses a finite float, reporting the cleaned text on failure.
fn parse_finite(cleaned: &str) -> Result<f64, ParseError> {
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            input: cleaned.to_owned(),
        })
}

/// Parses a score such as `"8,7"` or `"9.1"`. No range clamping is applied.
///
/// # Errors
///
/// Returns [`ParseError::InvalidNumber`] if the text is not a number.
pub fn parse_score(text: &str) -> Result<f64, ParseError> {
    parse_finite(&text.trim().replace(',', "."))
}

/// Parses a whole-unit price such as `"1.234 €"` into `1234.0`.
///
/// The currency symbol, all whitespace and thousands-separator periods are
/// removed before parsing.
///
/// # Errors
///
/// Returns [`ParseError::InvalidNumber`] if anything other than digits is
/// left after cleanup.
#[allow(clippy::cast_precision_loss)]
pub fn parse_price(text: &str) -> Result<f64, ParseError> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.' && !CURRENCY_SYMBOLS.contains(c))
        .collect();

    cleaned
        .parse::<u64>()
        .map(|v| v as f64)
        .map_err(|_| ParseError::InvalidNumber { input: cleaned })
}

/// Parses a location score such as `"Ubicación 9,2"` by dropping every word
/// that is followed by whitespace and parsing the rest as a score.
///
/// # Errors
///
/// Returns [`ParseError::InvalidNumber`] if what remains is not a number.
pub fn parse_location_score(text: &str) -> Result<f64, ParseError> {
    let stripped = LEADING_WORD.replace_all(text.trim(), "");
    parse_score(&stripped)
}

/// Parses a plain float, accepting a comma decimal separator.
///
/// # Errors
///
/// Returns [`ParseError::InvalidNumber`] if the text is not a number.
pub fn parse_float(text: &str) -> Result<f64, ParseError> {
    parse_score(text)
}

/// Parses a plain integer.
///
/// # Errors
///
/// Returns [`ParseError::InvalidNumber`] if the text is not an integer.
pub fn parse_integer(text: &str) -> Result<i64, ParseError> {
    let trimmed = text.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidNumber {
            input: trimmed.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn parses_comma_score() {
        assert_close(parse_score("8,7").unwrap(), 8.7);
    }

    #[test]
    fn parses_period_score() {
        assert_close(parse_score("9.1").unwrap(), 9.1);
    }

    #[test]
    fn score_ignores_surrounding_whitespace() {
        assert_close(parse_score(" 7,9 ").unwrap(), 7.9);
    }

    #[test]
    fn score_is_not_clamped() {
        assert_close(parse_score("11,5").unwrap(), 11.5);
    }

    #[test]
    fn rejects_non_numeric_score() {
        assert_eq!(
            parse_score("Fabuloso").unwrap_err(),
            ParseError::InvalidNumber {
                input: "Fabuloso".to_string()
            }
        );
    }

    #[test]
    fn rejects_non_finite_score() {
        assert!(parse_score("NaN").is_err());
        assert!(parse_score("inf").is_err());
    }

    #[test]
    fn parses_thousands_price() {
        assert_close(parse_price("1.234 €").unwrap(), 1234.0);
    }

    #[test]
    fn parses_small_price() {
        assert_close(parse_price("99 €").unwrap(), 99.0);
    }

    #[test]
    fn price_strips_non_breaking_space() {
        assert_close(parse_price("€\u{a0}2.015").unwrap(), 2015.0);
    }

    #[test]
    fn rejects_price_with_decimal_comma() {
        assert_eq!(
            parse_price("1.234,50 €").unwrap_err(),
            ParseError::InvalidNumber {
                input: "1234,50".to_string()
            }
        );
    }

    #[test]
    fn rejects_empty_price() {
        assert!(parse_price("€").is_err());
    }

    #[test]
    fn parses_location_score_with_label() {
        assert_close(parse_location_score("Ubicación 9,2").unwrap(), 9.2);
    }

    #[test]
    fn parses_location_score_with_multi_word_label() {
        assert_close(
            parse_location_score("Puntuación de ubicación 8,4").unwrap(),
            8.4,
        );
    }

    #[test]
    fn parses_bare_location_score() {
        assert_close(parse_location_score("9,0").unwrap(), 9.0);
    }

    #[test]
    fn rejects_location_score_without_number() {
        assert!(parse_location_score("Ubicación excelente").is_err());
    }

    #[test]
    fn parses_integer() {
        assert_eq!(parse_integer(" 145 ").unwrap(), 145);
        assert!(parse_integer("1,5").is_err());
    }
}
