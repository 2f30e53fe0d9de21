//! Points-of-interest listings (TripAdvisor city pages).
//!
//! A city page shows a row of category cells. The first cell uses a
//! featured layout and every other cell a compact one, so each gets its own
//! [`ExtractionStrategy`]. Both write the same columns, and every row also
//! carries the city and the category label of its cell.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use strum_macros::Display;
use travel_scrape_table::assemble;
use travel_scrape_table_models::{ColumnDef, ColumnParser, Schema, Table};

use crate::ScrapeError;
use crate::extract::{ExtractionStrategy, RuleSetExtractor};
use crate::registry::{TRIPADVISOR_PRIMARY_CELL, TRIPADVISOR_SECONDARY_CELL, rule_set};
use crate::rules::RuleSet;
use crate::source::{MarkupSource, PageRequest};

/// City the page belongs to.
pub const CITY: &str = "city";
/// Category label of the cell the item came from.
pub const CATEGORY: &str = "category";
/// Subcategory shown on the item.
pub const SUBCATEGORY: &str = "subcategory";
/// Attraction or activity name.
pub const NAME: &str = "name";
/// Price as displayed, currency suffix removed.
pub const PRICE: &str = "price";
/// Bubble rating.
pub const RATING: &str = "rating";
/// Number of reviews behind the rating.
pub const REVIEW_COUNT: &str = "review_count";
/// Link to the detail page.
pub const DETAIL_URL: &str = "detail_url";

/// Category labels, in the order the cells appear on the page.
pub const CATEGORIES: [&str; 6] = [
    "INPRESCINDIBLES",
    "GASTRONOMIA",
    "ARTE Y CULTURA",
    "ATRACCIONES PRINCIPALES",
    "OTRAS ATRACCIONES PRINCIPALES",
    "VISITAS GUIADAS",
];

/// Items read from each category cell.
pub const ITEMS_PER_CELL: usize = 4;

/// Marker the historical exports used for missing values.
pub const ABSENT_MARKER: &str = "Desconocido";

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(vec![
        ColumnDef::text(CITY),
        ColumnDef::text(CATEGORY),
        ColumnDef::text(SUBCATEGORY),
        ColumnDef::text(NAME),
        ColumnDef::text(PRICE),
        ColumnDef::new(RATING, ColumnParser::Rating),
        ColumnDef::new(REVIEW_COUNT, ColumnParser::ReviewCount),
        ColumnDef::text(DETAIL_URL),
    ])
    .unwrap_or_else(|_| unreachable!())
});

static CATEGORY_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.BYvbL.A").unwrap_or_else(|_| unreachable!()));

/// Returns the points-of-interest table schema.
#[must_use]
pub fn schema() -> &'static Schema {
    &SCHEMA
}

/// Compiles a category cell extractor from `rule_set`.
///
/// # Errors
///
/// Returns [`ScrapeError`] if the rule set does not compile against the
/// points-of-interest schema.
pub fn extractor(rule_set: &RuleSet) -> Result<RuleSetExtractor, ScrapeError> {
    RuleSetExtractor::new(rule_set, &schema().as_raw())
}

/// Layout of a category cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum CellKind {
    /// The first, featured cell.
    Primary,
    /// Every cell after the first.
    Secondary,
}

impl CellKind {
    /// Layout of the cell at `index`.
    #[must_use]
    pub const fn for_index(index: usize) -> Self {
        if index == 0 {
            Self::Primary
        } else {
            Self::Secondary
        }
    }
}

/// The pair of strategies a city page needs.
#[derive(Debug)]
pub struct ActivityExtractors {
    primary: RuleSetExtractor,
    secondary: RuleSetExtractor,
}

impl ActivityExtractors {
    /// Compiles both strategies from the given rule sets.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] if either rule set does not compile against
    /// the points-of-interest schema.
    pub fn from_rule_sets(primary: &RuleSet, secondary: &RuleSet) -> Result<Self, ScrapeError> {
        Ok(Self {
            primary: extractor(primary)?,
            secondary: extractor(secondary)?,
        })
    }

    /// Compiles the built-in strategies.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] if a built-in rule set does not compile.
    pub fn builtin() -> Result<Self, ScrapeError> {
        let load = |name: &str| {
            rule_set(name).ok_or_else(|| ScrapeError::UnknownRuleSet(name.to_owned()))
        };
        Self::from_rule_sets(
            &load(TRIPADVISOR_PRIMARY_CELL)?,
            &load(TRIPADVISOR_SECONDARY_CELL)?,
        )
    }

    /// Replaces the primary-cell strategy.
    #[must_use]
    pub fn with_primary(mut self, primary: RuleSetExtractor) -> Self {
        self.primary = primary;
        self
    }

    /// Replaces the secondary-cell strategy.
    #[must_use]
    pub fn with_secondary(mut self, secondary: RuleSetExtractor) -> Self {
        self.secondary = secondary;
        self
    }

    /// Returns the strategy for cells of `kind`.
    #[must_use]
    pub fn strategy(&self, kind: CellKind) -> &dyn ExtractionStrategy {
        match kind {
            CellKind::Primary => &self.primary,
            CellKind::Secondary => &self.secondary,
        }
    }
}

/// Extracts the category cells of one city page into a raw table.
///
/// # Errors
///
/// Returns [`ScrapeError::Schema`] if a record does not fit the schema.
pub fn raw_table(
    city: &str,
    html: &str,
    extractors: &ActivityExtractors,
) -> Result<Table, ScrapeError> {
    let raw_schema = schema().as_raw();
    let document = Html::parse_document(html);
    let mut table = Table::new(raw_schema.clone());

    for (index, (cell, category)) in document
        .select(&CATEGORY_CELL)
        .zip(CATEGORIES)
        .enumerate()
    {
        let kind = CellKind::for_index(index);
        let strategy = extractors.strategy(kind);
        let before = table.len();

        for item in cell.select(strategy.item_selector()).take(ITEMS_PER_CELL) {
            let mut record = raw_schema.builder();
            record.text(CITY, city)?.text(CATEGORY, category)?;
            table.push(strategy.extract(item, record)?)?;
        }

        log::debug!(
            "[{city}] {category} ({kind}): {} items",
            table.len() - before
        );
    }

    if table.is_empty() {
        log::warn!("[{city}] no category cells found");
    }
    Ok(table)
}

/// Scrapes one city page into a normalized points-of-interest table.
///
/// # Errors
///
/// Returns [`ScrapeError`] if a record does not fit the schema.
pub fn scrape_page_with(
    city: &str,
    html: &str,
    extractors: &ActivityExtractors,
) -> Result<Table, ScrapeError> {
    let raw = raw_table(city, html, extractors)?;
    let table = assemble(raw, schema())?;
    log::info!("[{city}] {} points of interest", table.len());
    Ok(table)
}

/// Scrapes one city page using the built-in rules.
///
/// # Errors
///
/// See [`scrape_page_with`].
pub fn scrape_page(city: &str, html: &str) -> Result<Table, ScrapeError> {
    scrape_page_with(city, html, &ActivityExtractors::builtin()?)
}

/// Loads the page of every city from `source` (keyed by the city's slug)
/// and concatenates the results in city order.
///
/// # Errors
///
/// Returns the first [`ScrapeError`] from loading or scraping a page.
pub fn scrape_cities(
    source: &dyn MarkupSource,
    cities: &[String],
    extractors: &ActivityExtractors,
) -> Result<Table, ScrapeError> {
    let mut table = Table::new(schema().clone());
    for city in cities {
        let html = source.fetch(&PageRequest::for_label(city))?;
        table.extend(scrape_page_with(city, &html, extractors)?)?;
    }
    Ok(table)
}
