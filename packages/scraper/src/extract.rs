//! Record extraction from one listing item.
//!
//! [`ExtractionStrategy`] is the capability every listing layout provides:
//! given one item fragment, fill a record. [`RuleSetExtractor`] is the
//! rule-driven implementation used for every built-in layout.

use scraper::{ElementRef, Selector};
use travel_scrape_table_models::{Cell, ColumnId, Record, RecordBuilder, Schema, SchemaError};

use crate::ScrapeError;
use crate::rules::{FieldRule, RuleSet, TextSource};

/// Why one field produced no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMiss {
    /// No descendant matched the field's selector.
    NoElement,
    /// The element lacks the requested attribute.
    NoAttribute(String),
    /// Post-processing left nothing.
    Empty,
}

impl std::fmt::Display for FieldMiss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoElement => f.write_str("no matching element"),
            Self::NoAttribute(name) => write!(f, "missing attribute '{name}'"),
            Self::Empty => f.write_str("empty after post-processing"),
        }
    }
}

/// Builds one record from one listing item.
pub trait ExtractionStrategy {
    /// Identifier used in log messages.
    fn name(&self) -> &str;

    /// Selector enumerating listing items within a page or a container.
    fn item_selector(&self) -> &Selector;

    /// Fills `record` from `item` and finishes it.
    ///
    /// Columns the strategy does not extract keep whatever `record` already
    /// holds. A field that cannot be read is left absent.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Schema`] if `record` is built against a schema
    /// whose columns differ from the one the strategy was compiled for.
    fn extract(
        &self,
        item: ElementRef<'_>,
        record: RecordBuilder<'_>,
    ) -> Result<Record, ScrapeError>;
}

/// A field rule with its selector compiled and its column resolved.
#[derive(Debug)]
struct CompiledRule {
    column: ColumnId,
    selector: Selector,
    rule: FieldRule,
}

impl CompiledRule {
    /// Reads this rule's field from `item`.
    fn read(&self, item: ElementRef<'_>) -> Result<String, FieldMiss> {
        let element = item.select(&self.selector).next().ok_or(FieldMiss::NoElement)?;

        let text = match &self.rule.source {
            TextSource::Text => element.text().collect::<String>(),
            TextSource::Attr { name } => element
                .value()
                .attr(name)
                .ok_or_else(|| FieldMiss::NoAttribute(name.clone()))?
                .to_owned(),
        };

        let text = self.rule.post_process(text);
        if text.is_empty() {
            return Err(FieldMiss::Empty);
        }
        Ok(text)
    }
}

/// Parses a CSS selector string, returning a [`ScrapeError`] on failure.
pub(crate) fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        selector: selector.to_owned(),
        message: e.to_string(),
    })
}

/// An [`ExtractionStrategy`] driven by a [`RuleSet`].
#[derive(Debug)]
pub struct RuleSetExtractor {
    name: String,
    item_selector: Selector,
    columns: Vec<String>,
    rules: Vec<CompiledRule>,
}

impl RuleSetExtractor {
    /// Compiles `rule_set` against `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Selector`] if a selector does not parse and
    /// [`ScrapeError::UnknownField`] if a rule targets a column `schema`
    /// does not declare.
    pub fn new(rule_set: &RuleSet, schema: &Schema) -> Result<Self, ScrapeError> {
        let item_selector = parse_selector(&rule_set.item_selector)?;

        let rules = rule_set
            .fields
            .iter()
            .map(|rule| {
                let column =
                    schema
                        .column_id(&rule.field)
                        .ok_or_else(|| ScrapeError::UnknownField {
                            rule_set: rule_set.name.clone(),
                            field: rule.field.clone(),
                        })?;
                Ok(CompiledRule {
                    column,
                    selector: parse_selector(&rule.selector)?,
                    rule: rule.clone(),
                })
            })
            .collect::<Result<Vec<_>, ScrapeError>>()?;

        Ok(Self {
            name: rule_set.name.clone(),
            item_selector,
            columns: schema.names().map(str::to_owned).collect(),
            rules,
        })
    }

    /// Returns the column names this extractor fills, in rule order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.rule.field.as_str())
    }
}

impl ExtractionStrategy for RuleSetExtractor {
    fn name(&self) -> &str {
        &self.name
    }

    fn item_selector(&self) -> &Selector {
        &self.item_selector
    }

    fn extract(
        &self,
        item: ElementRef<'_>,
        mut record: RecordBuilder<'_>,
    ) -> Result<Record, ScrapeError> {
        if !record.schema().names().eq(self.columns.iter().map(String::as_str)) {
            return Err(SchemaError::ColumnMismatch {
                expected: self.columns.clone(),
                actual: record.schema().names().map(str::to_owned).collect(),
            }
            .into());
        }

        for compiled in &self.rules {
            let cell = match compiled.read(item) {
                Ok(text) => Cell::Text(text),
                Err(miss) => {
                    log::debug!(
                        "[{}] field '{}' absent: {miss}",
                        self.name,
                        compiled.rule.field
                    );
                    Cell::Absent
                }
            };
            record.set(compiled.column, cell);
        }
        Ok(record.build())
    }
}

#[cfg(test)]
mod tests {
    use scraper::Html;
    use travel_scrape_table_models::ColumnDef;

    use super::*;
    use crate::rules::parse_rule_set_toml;

    const RULES: &str = r#"
        name = "cards"
        item_selector = "div.card"

        [[fields]]
        field = "name"
        selector = "h2"
        transforms = [{ type = "trim" }]

        [[fields]]
        field = "price"
        selector = "span.price"

        [[fields]]
        field = "link"
        selector = "a.title"
        source = { type = "attr", name = "href" }
    "#;

    const PAGE: &str = r#"
        <div class="card">
          <h2> Hotel Sol </h2>
          <span class="price">120 €</span>
          <a class="title" href="/hotel/sol">Ver</a>
        </div>
        <div class="card">
          <h2>Hostal Luna</h2>
          <a class="title" href="/hotel/luna">Ver</a>
        </div>
        <div class="card">
          <h2>Casa Mar</h2>
          <span class="price">80 €</span>
          <a class="title">Ver</a>
        </div>
    "#;

    fn schema() -> Schema {
        Schema::new(vec![
            ColumnDef::text("name"),
            ColumnDef::text("price"),
            ColumnDef::text("link"),
        ])
        .unwrap()
    }

    fn records() -> Vec<Record> {
        let schema = schema();
        let extractor = RuleSetExtractor::new(&parse_rule_set_toml(RULES).unwrap(), &schema).unwrap();
        let document = Html::parse_document(PAGE);
        document
            .select(extractor.item_selector())
            .map(|item| extractor.extract(item, schema.builder()).unwrap())
            .collect()
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn extracts_every_field_of_a_complete_item() {
        let records = records();
        assert_eq!(
            records[0].cells(),
            [text("Hotel Sol"), text("120 €"), text("/hotel/sol")]
        );
    }

    #[test]
    fn missing_element_only_affects_its_field() {
        let records = records();
        assert_eq!(
            records[1].cells(),
            [text("Hostal Luna"), Cell::Absent, text("/hotel/luna")]
        );
    }

    #[test]
    fn missing_attribute_only_affects_its_field() {
        let records = records();
        assert_eq!(
            records[2].cells(),
            [text("Casa Mar"), text("80 €"), Cell::Absent]
        );
    }

    #[test]
    fn keeps_prefilled_context_columns() {
        let schema = Schema::new(vec![
            ColumnDef::text("city"),
            ColumnDef::text("name"),
            ColumnDef::text("price"),
            ColumnDef::text("link"),
        ])
        .unwrap();
        let extractor = RuleSetExtractor::new(&parse_rule_set_toml(RULES).unwrap(), &schema).unwrap();
        let document = Html::parse_document(PAGE);
        let item = document.select(extractor.item_selector()).next().unwrap();

        let mut builder = schema.builder();
        builder.text("city", "Madrid").unwrap();
        let record = extractor.extract(item, builder).unwrap();

        assert_eq!(record.cells()[0], text("Madrid"));
        assert_eq!(record.cells()[1], text("Hotel Sol"));
    }

    #[test]
    fn rejects_builder_of_another_schema() {
        let extractor = RuleSetExtractor::new(&parse_rule_set_toml(RULES).unwrap(), &schema()).unwrap();
        let wider = Schema::new(vec![
            ColumnDef::text("city"),
            ColumnDef::text("name"),
            ColumnDef::text("price"),
            ColumnDef::text("link"),
        ])
        .unwrap();
        let document = Html::parse_document(PAGE);
        let item = document.select(extractor.item_selector()).next().unwrap();

        let mut builder = wider.builder();
        builder.text("city", "Madrid").unwrap();
        let err = extractor.extract(item, builder).unwrap_err();

        assert!(matches!(
            err,
            ScrapeError::Schema(SchemaError::ColumnMismatch { ref expected, ref actual })
                if expected == &["name", "price", "link"] && actual[0] == "city"
        ));
    }

    #[test]
    fn accepts_raw_copy_of_compiled_schema() {
        let extractor = RuleSetExtractor::new(&parse_rule_set_toml(RULES).unwrap(), &schema()).unwrap();
        let raw = schema().as_raw();
        let document = Html::parse_document(PAGE);
        let item = document.select(extractor.item_selector()).next().unwrap();

        let record = extractor.extract(item, raw.builder()).unwrap();
        assert_eq!(record.cells()[0], text("Hotel Sol"));
    }

    #[test]
    fn rejects_rule_for_unknown_column() {
        let narrow = Schema::new(vec![ColumnDef::text("name")]).unwrap();
        let err = RuleSetExtractor::new(&parse_rule_set_toml(RULES).unwrap(), &narrow).unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::UnknownField { ref field, .. } if field == "price"
        ));
    }

    #[test]
    fn rejects_invalid_selector() {
        let mut rule_set = parse_rule_set_toml(RULES).unwrap();
        rule_set.fields[0].selector = "h2[".to_string();
        let err = RuleSetExtractor::new(&rule_set, &schema()).unwrap_err();
        assert!(matches!(err, ScrapeError::Selector { .. }));
    }

    #[test]
    fn reports_fields_in_rule_order() {
        let extractor =
            RuleSetExtractor::new(&parse_rule_set_toml(RULES).unwrap(), &schema()).unwrap();
        assert_eq!(extractor.fields().collect::<Vec<_>>(), ["name", "price", "link"]);
    }
}
