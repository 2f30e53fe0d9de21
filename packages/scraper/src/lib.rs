#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Rule-driven listing extraction.
//!
//! Markup arrives from a [`source::MarkupSource`] (saved pages on disk, or
//! anything else that can hand back HTML). Each listing on a page is turned
//! into one record by an [`extract::ExtractionStrategy`], usually a
//! [`extract::RuleSetExtractor`] compiled from a TOML [`rules::RuleSet`].
//! Every field is extracted on its own: a field whose element or attribute
//! is missing becomes absent without affecting the rest of the record.
//!
//! The [`accommodation`] and [`activities`] modules wire this up for the two
//! page families and hand the raw records to
//! [`travel_scrape_table::assemble`] for column-wise normalization.

pub mod accommodation;
pub mod activities;
pub mod extract;
pub mod registry;
pub mod rules;
pub mod search;
pub mod source;

use travel_scrape_table::AssembleError;
use travel_scrape_table_models::SchemaError;

/// Errors that can occur while scraping a page into a table.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// A rule set contains a CSS selector that does not parse.
    #[error("invalid CSS selector '{selector}': {message}")]
    Selector {
        /// The selector text.
        selector: String,
        /// Parser message.
        message: String,
    },

    /// A rule set TOML document is malformed.
    #[error("rule set parse error: {0}")]
    Rules(#[from] toml::de::Error),

    /// A rule targets a column the schema does not declare.
    #[error("rule set '{rule_set}' targets unknown column '{field}'")]
    UnknownField {
        /// Rule set name.
        rule_set: String,
        /// The offending field name.
        field: String,
    },

    /// No built-in rule set has this name.
    #[error("unknown rule set '{0}'")]
    UnknownRuleSet(String),

    /// A record did not fit its schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Column-wise normalization failed.
    #[error(transparent)]
    Assemble(#[from] AssembleError),

    /// The markup source has no page for this key.
    #[error("page '{key}' not found")]
    PageNotFound {
        /// The requested page key.
        key: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Search parameters are inconsistent.
    #[error("invalid search: {0}")]
    InvalidSearch(String),
}
