//! Declarative field-accessor rules.
//!
//! A [`RuleSet`] names the selector that enumerates listing items and one
//! [`FieldRule`] per output column. Rule sets are plain TOML so a change in
//! the site's markup only needs a config edit:
//!
//! ```toml
//! name = "booking_property_card"
//! item_selector = 'div[data-testid="property-card"]'
//!
//! [[fields]]
//! field = "link"
//! selector = 'a[data-testid="title-link"]'
//! source = { type = "attr", name = "href" }
//! ```

use serde::Deserialize;

use crate::ScrapeError;

// ── Rule set ─────────────────────────────────────────────────────────────

/// A named collection of field rules for one listing layout.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSet {
    /// Unique identifier (e.g. `"tripadvisor_primary_cell"`).
    pub name: String,
    /// CSS selector matching one listing item.
    pub item_selector: String,
    /// One rule per extracted column.
    pub fields: Vec<FieldRule>,
}

/// How one column's raw text is pulled out of a listing item.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldRule {
    /// Output column name.
    pub field: String,
    /// CSS selector for the sub-element, matched against the item's
    /// descendants; the first match wins.
    pub selector: String,
    /// What to read from the matched element.
    #[serde(default)]
    pub source: TextSource,
    /// Post-processing applied in order.
    #[serde(default)]
    pub transforms: Vec<TextTransform>,
}

// ── Strategy enums ───────────────────────────────────────────────────────

/// What to read from a matched element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextSource {
    /// All descendant text nodes, concatenated.
    #[default]
    Text,
    /// The value of an attribute.
    Attr {
        /// Attribute name (e.g. `"href"`, `"aria-label"`).
        name: String,
    },
}

/// A post-processing step on extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextTransform {
    /// Keeps characters `start..end` (character positions, not bytes).
    CharRange {
        /// First character kept.
        start: usize,
        /// One past the last character kept.
        end: usize,
    },
    /// Removes every occurrence of a literal.
    Remove {
        /// Text to remove.
        text: String,
    },
    /// Strips leading and trailing whitespace.
    Trim,
}

impl TextTransform {
    /// Applies this step.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::CharRange { start, end } => text
                .chars()
                .skip(*start)
                .take(end.saturating_sub(*start))
                .collect(),
            Self::Remove { text: needle } => text.replace(needle.as_str(), ""),
            Self::Trim => text.trim().to_owned(),
        }
    }
}

impl FieldRule {
    /// Runs every transform over `text`.
    #[must_use]
    pub fn post_process(&self, text: String) -> String {
        self.transforms
            .iter()
            .fold(text, |acc, transform| transform.apply(&acc))
    }
}

/// Parses a rule set from TOML.
///
/// # Errors
///
/// Returns [`ScrapeError::Rules`] if the document is malformed.
pub fn parse_rule_set_toml(toml_str: &str) -> Result<RuleSet, ScrapeError> {
    Ok(toml::from_str(toml_str)?)
}

/// Reads and parses a rule set file.
///
/// # Errors
///
/// Returns [`ScrapeError::Io`] if the file cannot be read and
/// [`ScrapeError::Rules`] if it is malformed.
pub fn load_rule_set(path: &std::path::Path) -> Result<RuleSet, ScrapeError> {
    let text = std::fs::read_to_string(path)?;
    let rule_set = parse_rule_set_toml(&text)?;
    log::info!(
        "Loaded rule set '{}' ({} fields) from {}",
        rule_set.name,
        rule_set.fields.len(),
        path.display()
    );
    Ok(rule_set)
}
