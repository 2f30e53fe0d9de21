//! Built-in rule sets, loaded from embedded TOML.
//!
//! Each `.toml` file in `packages/scraper/rules/` is baked into the binary
//! at compile time via [`include_str!`].

use crate::rules::{RuleSet, parse_rule_set_toml};

/// Rule set for Booking.com property cards.
pub const BOOKING_PROPERTY_CARD: &str = "booking_property_card";
/// Rule set for the first TripAdvisor category cell.
pub const TRIPADVISOR_PRIMARY_CELL: &str = "tripadvisor_primary_cell";
/// Rule set for every other TripAdvisor category cell.
pub const TRIPADVISOR_SECONDARY_CELL: &str = "tripadvisor_secondary_cell";

/// TOML configs embedded at compile time.
const RULE_TOMLS: &[(&str, &str)] = &[
    (
        BOOKING_PROPERTY_CARD,
        include_str!("../rules/booking_property_card.toml"),
    ),
    (
        TRIPADVISOR_PRIMARY_CELL,
        include_str!("../rules/tripadvisor_primary_cell.toml"),
    ),
    (
        TRIPADVISOR_SECONDARY_CELL,
        include_str!("../rules/tripadvisor_secondary_cell.toml"),
    ),
];

/// Returns all built-in rule sets.
///
/// # Panics
///
/// Panics if any embedded TOML config is malformed.
#[must_use]
pub fn all_rule_sets() -> Vec<RuleSet> {
    RULE_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_rule_set_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Returns one built-in rule set by name.
///
/// # Panics
///
/// Panics if the embedded TOML config is malformed.
#[must_use]
pub fn rule_set(name: &str) -> Option<RuleSet> {
    RULE_TOMLS.iter().find(|(n, _)| *n == name).map(|(n, toml)| {
        parse_rule_set_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {n}.toml: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_rule_sets() {
        assert_eq!(all_rule_sets().len(), RULE_TOMLS.len());
    }

    #[test]
    fn rule_set_names_match_registry_keys() {
        for (key, _) in RULE_TOMLS {
            assert_eq!(rule_set(key).unwrap().name, *key);
        }
    }

    #[test]
    fn unknown_rule_set_is_none() {
        assert!(rule_set("expedia").is_none());
    }

    #[test]
    fn cell_rule_sets_share_field_names() {
        let primary = rule_set(TRIPADVISOR_PRIMARY_CELL).unwrap();
        let secondary = rule_set(TRIPADVISOR_SECONDARY_CELL).unwrap();
        let names = |rs: &RuleSet| rs.fields.iter().map(|f| f.field.clone()).collect::<Vec<_>>();
        assert_eq!(names(&primary), names(&secondary));
    }

    #[test]
    fn cell_rule_sets_differ_in_locators() {
        let primary = rule_set(TRIPADVISOR_PRIMARY_CELL).unwrap();
        let secondary = rule_set(TRIPADVISOR_SECONDARY_CELL).unwrap();
        assert_ne!(primary.fields[1].selector, secondary.fields[1].selector);
    }
}
