//! Search URLs handed to the page-fetching collaborator.

use chrono::NaiveDate;

use crate::ScrapeError;
use crate::source::PageRequest;

/// Base URL of the Spanish-language Booking.com search results page.
const BOOKING_SEARCH_URL: &str = "https://www.booking.com/searchresults.es.html";

/// A Booking.com city search for one stay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSearch {
    /// Booking.com destination id of the city.
    pub dest_id: String,
    /// Check-in date.
    pub checkin: NaiveDate,
    /// Check-out date.
    pub checkout: NaiveDate,
    /// Number of adults.
    pub adults: u32,
    /// Number of rooms.
    pub rooms: u32,
    /// Number of children.
    pub children: u32,
}

impl BookingSearch {
    /// Creates a search for two adults in one room.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::InvalidSearch`] if `checkout` is not after
    /// `checkin` or `dest_id` is empty.
    pub fn new(dest_id: &str, checkin: NaiveDate, checkout: NaiveDate) -> Result<Self, ScrapeError> {
        if dest_id.trim().is_empty() {
            return Err(ScrapeError::InvalidSearch(
                "destination id is empty".to_owned(),
            ));
        }
        if checkout <= checkin {
            return Err(ScrapeError::InvalidSearch(format!(
                "check-out {checkout} is not after check-in {checkin}"
            )));
        }
        Ok(Self {
            dest_id: dest_id.trim().to_owned(),
            checkin,
            checkout,
            adults: 2,
            rooms: 1,
            children: 0,
        })
    }

    /// Sets the party size.
    #[must_use]
    pub const fn with_party(mut self, adults: u32, rooms: u32, children: u32) -> Self {
        self.adults = adults;
        self.rooms = rooms;
        self.children = children;
        self
    }

    /// Number of nights in the stay.
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.checkout - self.checkin).num_days()
    }

    /// Renders the search results URL.
    #[must_use]
    pub fn url(&self) -> String {
        format!(
            "{BOOKING_SEARCH_URL}?lang=es&dest_id={}&dest_type=city&checkin={}&checkout={}&group_adults={}&no_rooms={}&group_children={}",
            self.dest_id, self.checkin, self.checkout, self.adults, self.rooms, self.children,
        )
    }

    /// Returns a page request keyed by destination id.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(&self.dest_id).with_url(&self.url())
    }
}
