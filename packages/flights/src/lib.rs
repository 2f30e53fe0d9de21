#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Flight search results.
//!
//! Converts the JSON body of a flight search API response into a typed
//! table with one row per round-trip itinerary. Only the first two legs of
//! each itinerary (outbound and return) are read.

pub mod charts;

use std::sync::LazyLock;

use serde::Deserialize;
use travel_scrape_table_models::{Cell, ColumnDef, ColumnParser, Schema, SchemaError, Table};

/// Itinerary id.
pub const ID: &str = "id";
/// Total price.
pub const PRICE: &str = "price";
/// Outbound departure time.
pub const DEPARTURE_1: &str = "departure_1";
/// Outbound arrival time.
pub const ARRIVAL_1: &str = "arrival_1";
/// Outbound duration in minutes.
pub const DURATION_1: &str = "duration_1";
/// Outbound origin airport.
pub const ORIGIN_1: &str = "origin_1";
/// Outbound destination airport.
pub const DESTINATION_1: &str = "destination_1";
/// Return departure time.
pub const DEPARTURE_2: &str = "departure_2";
/// Return arrival time.
pub const ARRIVAL_2: &str = "arrival_2";
/// Return duration in minutes.
pub const DURATION_2: &str = "duration_2";
/// Return origin airport.
pub const ORIGIN_2: &str = "origin_2";
/// Return destination airport.
pub const DESTINATION_2: &str = "destination_2";
/// Row label: index plus both routes.
pub const FLIGHT_NAME: &str = "flight_name";
/// Outbound plus return duration in minutes.
pub const TOTAL_DURATION: &str = "total_duration";

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(vec![
        ColumnDef::text(ID),
        ColumnDef::new(PRICE, ColumnParser::Float),
        ColumnDef::text(DEPARTURE_1),
        ColumnDef::text(ARRIVAL_1),
        ColumnDef::new(DURATION_1, ColumnParser::Integer),
        ColumnDef::text(ORIGIN_1),
        ColumnDef::text(DESTINATION_1),
        ColumnDef::text(DEPARTURE_2),
        ColumnDef::text(ARRIVAL_2),
        ColumnDef::new(DURATION_2, ColumnParser::Integer),
        ColumnDef::text(ORIGIN_2),
        ColumnDef::text(DESTINATION_2),
        ColumnDef::text(FLIGHT_NAME),
        ColumnDef::new(TOTAL_DURATION, ColumnParser::Integer),
    ])
    .unwrap_or_else(|_| unreachable!())
});

/// Errors that can occur while converting a flight search response.
#[derive(Debug, thiserror::Error)]
pub enum FlightsError {
    /// The response body is not the expected JSON shape.
    #[error("invalid flight search response: {0}")]
    Json(#[from] serde_json::Error),

    /// An itinerary does not have both an outbound and a return leg.
    #[error("itinerary '{itinerary_id}' has {legs} leg(s), expected at least 2")]
    MissingLeg {
        /// The offending itinerary.
        itinerary_id: String,
        /// Number of legs it has.
        legs: usize,
    },

    /// The leg durations of an itinerary do not sum within `i64`.
    #[error("itinerary '{itinerary_id}' total duration overflows")]
    DurationOverflow {
        /// The offending itinerary.
        itinerary_id: String,
    },

    /// A row did not fit the itinerary schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Top-level response body.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: SearchData,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    itineraries: Vec<Itinerary>,
}

/// One priced itinerary.
#[derive(Debug, Clone, Deserialize)]
pub struct Itinerary {
    /// Provider id.
    pub id: String,
    /// Price block.
    pub price: ItineraryPrice,
    /// Legs in travel order.
    pub legs: Vec<Leg>,
}

/// Itinerary price.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ItineraryPrice {
    /// Numeric amount.
    pub raw: f64,
}

/// One flight leg.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    /// Local departure time as sent by the API.
    pub departure: String,
    /// Local arrival time as sent by the API.
    pub arrival: String,
    /// Leg duration.
    pub duration_in_minutes: i64,
    /// Departure airport.
    pub origin: Place,
    /// Arrival airport.
    pub destination: Place,
}

/// An airport.
#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    /// Display name.
    pub name: String,
}

/// Returns the itinerary table schema.
#[must_use]
pub fn schema() -> &'static Schema {
    &SCHEMA
}

/// Parses the itineraries out of a response body.
///
/// # Errors
///
/// Returns [`FlightsError::Json`] if the body does not have the expected
/// `data.itineraries` shape.
pub fn parse_itineraries(json: &str) -> Result<Vec<Itinerary>, FlightsError> {
    let response: SearchResponse = serde_json::from_str(json)?;
    Ok(response.data.itineraries)
}

/// Formats the row label of an itinerary.
#[must_use]
pub fn flight_name(index: usize, outbound: &Leg, inbound: &Leg) -> String {
    format!(
        "{index} {} -> {} / {} -> {}",
        outbound.origin.name,
        outbound.destination.name,
        inbound.origin.name,
        inbound.destination.name
    )
}

/// Builds the itinerary table from parsed itineraries, in input order.
///
/// # Errors
///
/// Returns [`FlightsError::MissingLeg`] for the first itinerary with fewer
/// than two legs and [`FlightsError::DurationOverflow`] if its leg durations
/// cannot be summed.
pub fn build_table(itineraries: &[Itinerary]) -> Result<Table, FlightsError> {
    let schema = schema();
    let mut table = Table::new(schema.clone());

    for (index, itinerary) in itineraries.iter().enumerate() {
        let [outbound, inbound, ..] = itinerary.legs.as_slice() else {
            return Err(FlightsError::MissingLeg {
                itinerary_id: itinerary.id.clone(),
                legs: itinerary.legs.len(),
            });
        };
        if itinerary.legs.len() > 2 {
            log::warn!(
                "Itinerary '{}' has {} legs, reading the first two",
                itinerary.id,
                itinerary.legs.len()
            );
        }

        let total_duration = outbound
            .duration_in_minutes
            .checked_add(inbound.duration_in_minutes)
            .ok_or_else(|| FlightsError::DurationOverflow {
                itinerary_id: itinerary.id.clone(),
            })?;

        let mut record = schema.builder();
        record
            .text(ID, &itinerary.id)?
            .set_named(PRICE, Cell::Float(itinerary.price.raw))?;
        for (leg, [departure, arrival, duration, origin, destination]) in [
            (outbound, [DEPARTURE_1, ARRIVAL_1, DURATION_1, ORIGIN_1, DESTINATION_1]),
            (inbound, [DEPARTURE_2, ARRIVAL_2, DURATION_2, ORIGIN_2, DESTINATION_2]),
        ] {
            record
                .text(departure, &leg.departure)?
                .text(arrival, &leg.arrival)?
                .set_named(duration, Cell::Integer(leg.duration_in_minutes))?
                .text(origin, &leg.origin.name)?
                .text(destination, &leg.destination.name)?;
        }
        record
            .text(FLIGHT_NAME, &flight_name(index, outbound, inbound))?
            .set_named(TOTAL_DURATION, Cell::Integer(total_duration))?;

        table.push(record.build())?;
    }

    log::info!("Built {} itineraries", table.len());
    Ok(table)
}

/// Converts a flight search response body into the itinerary table.
///
/// # Errors
///
/// Returns [`FlightsError`] if the body is malformed or an itinerary lacks a
/// return leg.
pub fn itineraries_table(json: &str) -> Result<Table, FlightsError> {
    build_table(&parse_itineraries(json)?)
}
