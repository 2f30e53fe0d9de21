//! Accommodation listings (Booking.com search results).
//!
//! One record per `property-card`. Distance, score, location score and price
//! are normalized column-wise by [`travel_scrape_table::assemble`].

use std::sync::LazyLock;

use scraper::Html;
use travel_scrape_table::assemble;
use travel_scrape_table::chart::{ChartError, ChartSink, ChartStyle, Orientation, comparison_chart};
use travel_scrape_table_models::{ColumnDef, ColumnParser, Schema, Table};

use crate::ScrapeError;
use crate::extract::{ExtractionStrategy, RuleSetExtractor};
use crate::registry::{BOOKING_PROPERTY_CARD, rule_set};
use crate::rules::RuleSet;
use crate::source::{MarkupSource, PageRequest};

/// Accommodation name.
pub const NAME: &str = "name";
/// Street address.
pub const ADDRESS: &str = "address";
/// Distance to the city center, in kilometers.
pub const DISTANCE_TO_CENTER: &str = "distance_to_center";
/// Guest review score.
pub const SCORE: &str = "score";
/// Location review score.
pub const LOCATION_SCORE: &str = "location_score";
/// Total price for the stay, in euros.
pub const PRICE: &str = "price";
/// Link to the accommodation page.
pub const LINK: &str = "link";

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(vec![
        ColumnDef::text(NAME),
        ColumnDef::text(ADDRESS),
        ColumnDef::new(DISTANCE_TO_CENTER, ColumnParser::Distance),
        ColumnDef::new(SCORE, ColumnParser::Score),
        ColumnDef::new(LOCATION_SCORE, ColumnParser::LocationScore),
        ColumnDef::new(PRICE, ColumnParser::Price),
        ColumnDef::text(LINK),
    ])
    .unwrap_or_else(|_| unreachable!())
});

/// Returns the accommodation table schema.
#[must_use]
pub fn schema() -> &'static Schema {
    &SCHEMA
}

/// Compiles an extractor for property cards from `rule_set`.
///
/// # Errors
///
/// Returns [`ScrapeError`] if the rule set does not compile against the
/// accommodation schema.
pub fn extractor(rule_set: &RuleSet) -> Result<RuleSetExtractor, ScrapeError> {
    RuleSetExtractor::new(rule_set, &schema().as_raw())
}

/// Compiles the built-in property card extractor.
///
/// # Errors
///
/// Returns [`ScrapeError`] if the built-in rule set does not compile.
pub fn builtin_extractor() -> Result<RuleSetExtractor, ScrapeError> {
    let rules = rule_set(BOOKING_PROPERTY_CARD)
        .ok_or_else(|| ScrapeError::UnknownRuleSet(BOOKING_PROPERTY_CARD.to_owned()))?;
    extractor(&rules)
}

/// Extracts every property card of a search results page into a raw table
/// (all cells text or absent).
///
/// # Errors
///
/// Returns [`ScrapeError::Schema`] if a record does not fit the schema.
pub fn raw_table(html: &str, strategy: &dyn ExtractionStrategy) -> Result<Table, ScrapeError> {
    let raw_schema = schema().as_raw();
    let document = Html::parse_document(html);
    let mut table = Table::new(raw_schema.clone());

    for item in document.select(strategy.item_selector()) {
        table.push(strategy.extract(item, raw_schema.builder())?)?;
    }

    log::info!(
        "[{}] extracted {} property cards",
        strategy.name(),
        table.len()
    );
    Ok(table)
}

/// Scrapes a search results page into a normalized accommodation table.
///
/// # Errors
///
/// Returns [`ScrapeError::Assemble`] if a score, location score or price
/// cell does not have the expected shape.
pub fn scrape_page_with(html: &str, strategy: &dyn ExtractionStrategy) -> Result<Table, ScrapeError> {
    let raw = raw_table(html, strategy)?;
    Ok(assemble(raw, schema())?)
}

/// Scrapes a search results page using the built-in rules.
///
/// # Errors
///
/// See [`scrape_page_with`].
pub fn scrape_page(html: &str) -> Result<Table, ScrapeError> {
    scrape_page_with(html, &builtin_extractor()?)
}

/// Loads each requested page from `source` and concatenates the results.
///
/// # Errors
///
/// Returns the first [`ScrapeError`] from loading or scraping a page.
pub fn scrape_pages(
    source: &dyn MarkupSource,
    requests: &[PageRequest],
    strategy: &dyn ExtractionStrategy,
) -> Result<Table, ScrapeError> {
    let mut table = Table::new(schema().clone());
    for request in requests {
        let html = source.fetch(request)?;
        let page = scrape_page_with(&html, strategy)?;
        log::info!("[{}] {} accommodations", request.key, page.len());
        table.extend(page)?;
    }
    Ok(table)
}

/// Sends a price-by-name bar chart for `city` to `sink`.
///
/// # Errors
///
/// Returns [`ChartError`] if the chart cannot be built or emitted.
pub fn render_price_comparison(
    table: &Table,
    city: &str,
    sink: &mut dyn ChartSink,
) -> Result<(), ChartError> {
    let style = ChartStyle::new(
        &format!("Comparación precios alojamiento {city}"),
        "Alojamiento",
        "Precio (€)",
        Orientation::Horizontal,
        "teal",
    );
    let chart = comparison_chart(table, NAME, PRICE, style)?;
    sink.render(&chart.into())
}

#[cfg(test)]
mod tests {
    use travel_scrape_table::AssembleError;
    use travel_scrape_table::chart::Figure;
    use travel_scrape_table_models::Cell;

    use super::*;
    use crate::source::StaticSource;

    const PAGE: &str = include_str!("../fixtures/booking_search.html");

    #[derive(Default)]
    struct Collect(Vec<Figure>);

    impl ChartSink for Collect {
        fn render(&mut self, figure: &Figure) -> Result<(), ChartError> {
            self.0.push(figure.clone());
            Ok(())
        }
    }

    #[test]
    fn builtin_rules_cover_schema_columns() {
        let extractor = builtin_extractor().unwrap();
        let fields: Vec<_> = extractor.fields().collect();
        assert_eq!(fields, schema().names().collect::<Vec<_>>());
    }

    #[test]
    fn scrapes_fixture_page() {
        let table = scrape_page(PAGE).unwrap();
        assert_eq!(table.len(), 3);

        assert_eq!(
            table.cell(0, NAME),
            Some(&Cell::Text("Hotel Puerta del Sol".to_string()))
        );
        assert_eq!(table.cell(0, DISTANCE_TO_CENTER), Some(&Cell::Float(0.5)));
        assert_eq!(table.cell(0, SCORE), Some(&Cell::Float(8.7)));
        assert_eq!(table.cell(0, LOCATION_SCORE), Some(&Cell::Float(9.6)));
        assert_eq!(table.cell(0, PRICE), Some(&Cell::Float(1234.0)));
        assert_eq!(
            table.cell(0, LINK),
            Some(&Cell::Text("https://www.booking.com/hotel/es/puerta-del-sol.html".to_string()))
        );

        assert_eq!(table.cell(1, DISTANCE_TO_CENTER), Some(&Cell::Float(2.5)));
        assert_eq!(table.cell(1, PRICE), Some(&Cell::Float(99.0)));
    }

    #[test]
    fn card_missing_one_field_keeps_the_rest() {
        let table = scrape_page(PAGE).unwrap();
        // The third card has no location score link.
        assert_eq!(table.cell(2, LOCATION_SCORE), Some(&Cell::Absent));
        assert_eq!(
            table.cell(2, NAME),
            Some(&Cell::Text("Apartamentos Retiro".to_string()))
        );
        assert_eq!(table.cell(2, SCORE), Some(&Cell::Float(9.1)));
        assert_eq!(table.cell(2, PRICE), Some(&Cell::Float(310.0)));
        assert_eq!(table.cell(2, DISTANCE_TO_CENTER), Some(&Cell::Absent));
    }

    #[test]
    fn malformed_price_aborts_the_pass() {
        let page = PAGE.replace("99 €", "consultar");
        let err = scrape_page(&page).unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::Assemble(AssembleError::Conversion { ref column, row: 1, .. }) if column == PRICE
        ));
    }

    #[test]
    fn page_without_cards_is_empty() {
        let table = scrape_page("<html><body><p>Sin resultados</p></body></html>").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.schema().len(), 7);
    }

    #[test]
    fn concatenates_pages_in_request_order() {
        let source = StaticSource::new().with_page("madrid", PAGE).with_page("empty", "<html></html>");
        let requests = [PageRequest::new("madrid"), PageRequest::new("empty"), PageRequest::new("madrid")];
        let table = scrape_pages(&source, &requests, &builtin_extractor().unwrap()).unwrap();
        assert_eq!(table.len(), 6);
        assert_eq!(table.cell(3, NAME), table.cell(0, NAME));
    }

    #[test]
    fn renders_price_chart() {
        let table = scrape_page(PAGE).unwrap();
        let mut sink = Collect::default();
        render_price_comparison(&table, "Madrid", &mut sink).unwrap();
        let chart = &sink.0[0].panels[0];
        assert_eq!(chart.bars.len(), 3);
        assert_eq!(chart.bars[1].label, "Hostal Luna");
        assert!(chart.style.title.ends_with("Madrid"));
    }
}
