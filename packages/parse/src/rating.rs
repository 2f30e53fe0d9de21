//! Rating-with-count descriptors.
//!
//! Points-of-interest cards encode the rating and the number of reviews in a
//! single ARIA label, e.g. `"4,5 de 5 burbujas. 1.234 opiniones"`. The first
//! token is the rating and the second-to-last token is the review count.

/// Thousands separators stripped from review counts.
const COUNT_SEPARATORS: &[char] = &['.', ',', '\u{a0}', '\u{202f}'];

/// Rating and review count parsed from one descriptor.
///
/// Either half is independently `None` when the descriptor deviates from the
/// expected layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingSummary {
    /// Leading rating, e.g. `8.5`.
    pub rating: Option<f64>,
    /// Trailing review count, e.g. `234`.
    pub count: Option<u64>,
}

/// Parses a descriptor such as `"8,5 de 10, 234 opiniones"`.
#[must_use]
pub fn parse_rating_with_count(text: &str) -> RatingSummary {
    let tokens: Vec<&str> = text.split_whitespace().collect();

    let rating = tokens
        .first()
        .and_then(|t| t.replace(',', ".").parse::<f64>().ok())
        .filter(|v| v.is_finite());

    // With fewer than three tokens the second-to-last one is the rating
    // itself or the word right after it.
    let count = if tokens.len() >= 3 {
        tokens.get(tokens.len() - 2).and_then(|t| {
            let digits: String = t.chars().filter(|c| !COUNT_SEPARATORS.contains(c)).collect();
            digits.parse::<u64>().ok()
        })
    } else {
        None
    };

    RatingSummary { rating, count }
}
