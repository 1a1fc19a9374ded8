//! Parsing for the scraped events feed.
//!
//! The scraper emits a JSON array of event records. Individual fields are
//! handled leniently (a junk timestamp becomes `starts_at = None`), but a
//! feed that is not valid JSON at all is a real error.

use tracing::debug;

use crate::error::StadtpulsError;
use crate::types::Event;

/// The full event set for one city, as delivered by the scraper.
#[derive(Debug, Clone, Default)]
pub struct EventCatalog {
    events: Vec<Event>,
}

impl EventCatalog {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Parse a scraped feed. Fails only when the payload is not a JSON
    /// array of event records; per-field junk degrades to `None`.
    pub fn from_json(raw: &str) -> Result<Self, StadtpulsError> {
        let events: Vec<Event> =
            serde_json::from_str(raw).map_err(|e| StadtpulsError::Catalog(e.to_string()))?;

        let missing_start = events.iter().filter(|e| e.starts_at.is_none()).count();
        if missing_start > 0 {
            debug!(
                total = events.len(),
                missing_start, "catalog contains events without a parseable start instant"
            );
        }

        Ok(Self { events })
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
