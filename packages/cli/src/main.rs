#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the travel listing scrapers.
//!
//! Pages are read from a directory of saved markup (whatever fetched them
//! wrote `<key>.html` files there). Results go to CSV on a file or stdout,
//! and chart descriptions to a JSON-lines file for an external renderer.

mod output;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use travel_scrape_scraper::ScrapeError;
use travel_scrape_scraper::accommodation;
use travel_scrape_scraper::activities::{self, ActivityExtractors};
use travel_scrape_scraper::extract::RuleSetExtractor;
use travel_scrape_scraper::registry::all_rule_sets;
use travel_scrape_scraper::rules::{RuleSet, load_rule_set};
use travel_scrape_scraper::search::BookingSearch;
use travel_scrape_scraper::source::{DirectorySource, PageRequest};

use crate::output::{emit_csv, with_chart_sink};

#[derive(Parser)]
#[command(name = "travel_scrape", about = "Travel listing scraping and normalization")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape saved Booking.com search result pages into one accommodation table
    Accommodation {
        /// Directory holding the saved pages
        #[arg(long)]
        dir: PathBuf,
        /// Page keys to read (`<dir>/<key>.html`), in output order
        #[arg(long = "page", required = true)]
        pages: Vec<String>,
        /// Rule set file replacing the built-in property card rules
        #[arg(long)]
        rules: Option<PathBuf>,
        /// CSV output file (stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Text written for absent cells
        #[arg(long, default_value = "")]
        absent_marker: String,
        /// Write a price comparison chart description to this file
        #[arg(long)]
        chart_out: Option<PathBuf>,
        /// City name used in chart titles
        #[arg(long, default_value = "")]
        city: String,
    },
    /// Scrape saved TripAdvisor city pages into one points-of-interest table
    Activities {
        /// Directory holding the saved pages (`<dir>/<city slug>.html`)
        #[arg(long)]
        dir: PathBuf,
        /// Cities to read, in output order
        #[arg(long = "city", required = true)]
        cities: Vec<String>,
        /// Rule set file replacing the built-in first-cell rules
        #[arg(long)]
        primary_rules: Option<PathBuf>,
        /// Rule set file replacing the built-in other-cell rules
        #[arg(long)]
        secondary_rules: Option<PathBuf>,
        /// CSV output file (stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Text written for absent cells
        #[arg(long, default_value = activities::ABSENT_MARKER)]
        absent_marker: String,
    },
    /// Convert a saved flight search response into an itinerary table
    Flights {
        /// JSON response body
        #[arg(long)]
        json: PathBuf,
        /// Destination city, used in chart titles
        #[arg(long)]
        city: String,
        /// CSV output file (stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write price, duration and side-by-side chart descriptions to this file
        #[arg(long)]
        chart_out: Option<PathBuf>,
    },
    /// Print the Booking.com search URL for a city and stay
    BookingUrl {
        /// Booking.com destination id (e.g. "-390625" for Madrid)
        #[arg(long, allow_hyphen_values = true)]
        dest_id: String,
        /// Check-in date (YYYY-MM-DD)
        #[arg(long)]
        checkin: NaiveDate,
        /// Check-out date (YYYY-MM-DD)
        #[arg(long)]
        checkout: NaiveDate,
        /// Number of adults
        #[arg(long, default_value = "2")]
        adults: u32,
        /// Number of rooms
        #[arg(long, default_value = "1")]
        rooms: u32,
        /// Number of children
        #[arg(long, default_value = "0")]
        children: u32,
    },
    /// List the built-in extraction rule sets
    Rules,
}

/// Compiles `path` with `compile` when an override file was given.
fn override_rules(
    path: Option<&Path>,
    compile: impl FnOnce(&RuleSet) -> Result<RuleSetExtractor, ScrapeError>,
) -> Result<Option<RuleSetExtractor>, ScrapeError> {
    path.map(|path| compile(&load_rule_set(path)?)).transpose()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Accommodation {
            dir,
            pages,
            rules,
            out,
            absent_marker,
            chart_out,
            city,
        } => {
            let extractor = match override_rules(rules.as_deref(), accommodation::extractor)? {
                Some(extractor) => extractor,
                None => accommodation::builtin_extractor()?,
            };
            let requests: Vec<_> = pages.iter().map(|key| PageRequest::new(key.as_str())).collect();
            let table = accommodation::scrape_pages(&DirectorySource::new(&dir), &requests, &extractor)?;
            log::info!("{} accommodations from {} page(s)", table.len(), requests.len());

            emit_csv(&table, out.as_deref(), &absent_marker)?;
            with_chart_sink(chart_out.as_deref(), |sink| {
                accommodation::render_price_comparison(&table, &city, sink)
            })?;
        }
        Commands::Activities {
            dir,
            cities,
            primary_rules,
            secondary_rules,
            out,
            absent_marker,
        } => {
            let mut extractors = ActivityExtractors::builtin()?;
            if let Some(primary) = override_rules(primary_rules.as_deref(), activities::extractor)? {
                extractors = extractors.with_primary(primary);
            }
            if let Some(secondary) = override_rules(secondary_rules.as_deref(), activities::extractor)? {
                extractors = extractors.with_secondary(secondary);
            }

            let table = activities::scrape_cities(&DirectorySource::new(&dir), &cities, &extractors)?;
            log::info!("{} points of interest from {} city page(s)", table.len(), cities.len());

            emit_csv(&table, out.as_deref(), &absent_marker)?;
        }
        Commands::Flights {
            json,
            city,
            out,
            chart_out,
        } => {
            let body = std::fs::read_to_string(&json)?;
            let table = travel_scrape_flights::itineraries_table(&body)?;
            log::info!("{} itineraries to {city}", table.len());

            emit_csv(&table, out.as_deref(), "")?;
            with_chart_sink(chart_out.as_deref(), |sink| {
                travel_scrape_flights::charts::render_all(&table, &city, sink)
            })?;
        }
        Commands::BookingUrl {
            dest_id,
            checkin,
            checkout,
            adults,
            rooms,
            children,
        } => {
            let search =
                BookingSearch::new(&dest_id, checkin, checkout)?.with_party(adults, rooms, children);
            log::debug!("{} night(s)", search.nights());
            println!("{}", search.url());
        }
        Commands::Rules => {
            println!("{:<30} ITEM SELECTOR", "NAME");
            println!("{}", "-".repeat(60));
            for rule_set in all_rule_sets() {
                println!("{:<30} {}", rule_set.name, rule_set.item_selector);
            }
        }
    }

    Ok(())
}
