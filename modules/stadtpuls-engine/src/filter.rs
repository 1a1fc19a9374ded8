//! Event selection for the map and the filter-bar badges.
//!
//! Per event the gates run in a fixed precedence, short-circuiting at the
//! first decision: bookmark override, time window, category, distance.
//! `select` applies all four; `count_by_category` deliberately skips the
//! category gate so sibling badge counts stay independent of the currently
//! selected category.
//!
//! Passes are pure transforms: survivors are returned as new records with
//! `distance_km` populated (or cleared), the input collection is never
//! touched. No gate errors or panics; missing data degrades to "pass".

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use stadtpuls_common::{haversine_km, predefined, Event, GeoPoint};

use crate::taxonomy::{CategoryTaxonomy, CATEGORY_ALL, UNCATEGORIZED};
use crate::time_window::{self, TimeFilter};
use crate::traits::{BookmarkStore, Clock, SystemClock};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How the filter bar picks the reference location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMode {
    /// One of the named city spots.
    Predefined,
    /// A lat/lng pair the user dropped on the map.
    Custom,
    /// The device position, supplied by the caller per pass.
    Geolocation,
}

/// Filter-bar state. Built by the UI layer; the engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default)]
    pub time_filter: TimeFilter,
    pub max_distance_km: f64,
    /// Leaf key, group key, or `"all"`.
    pub category: String,
    pub location_mode: LocationMode,
    #[serde(default)]
    pub custom_lat: Option<f64>,
    #[serde(default)]
    pub custom_lng: Option<f64>,
    #[serde(default)]
    pub predefined_index: Option<usize>,
}

impl Filters {
    /// Resolve the filter bar's location mode to a concrete reference point.
    ///
    /// `device` is the current geolocation fix, if any. Returns `None` when
    /// the mode cannot produce a point (no fix, missing custom pair,
    /// out-of-range predefined index) — the distance gate then degrades to
    /// "always pass".
    pub fn reference_location(&self, device: Option<GeoPoint>) -> Option<GeoPoint> {
        match self.location_mode {
            LocationMode::Predefined => self.predefined_index.and_then(predefined),
            LocationMode::Custom => match (self.custom_lat, self.custom_lng) {
                (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
                _ => None,
            },
            LocationMode::Geolocation => device,
        }
    }
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            time_filter: TimeFilter::default(),
            max_distance_km: 25.0,
            category: CATEGORY_ALL.to_string(),
            location_mode: LocationMode::Predefined,
            custom_lat: None,
            custom_lng: None,
            predefined_index: Some(0),
        }
    }
}

/// Outcome of judging a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    /// Bookmarked — bypasses every gate.
    Bookmarked,
    Keep,
    RejectedByTime,
    RejectedByCategory,
    RejectedByDistance,
}

/// Counters produced by one selection pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionStats {
    pub total: u32,
    /// Survivors that passed every gate on merit.
    pub kept: u32,
    /// Survivors kept by the bookmark override.
    pub bookmarked: u32,
    pub rejected_time: u32,
    pub rejected_category: u32,
    pub rejected_distance: u32,
    /// Non-bookmarked events with no parseable start instant. These pass
    /// the time gate; the counter makes bad feed data visible.
    pub missing_start: u32,
}

/// Everything a pass needs to judge a single event.
struct PassContext<'a> {
    cutoff: DateTime<Utc>,
    filters: &'a Filters,
    reference: Option<GeoPoint>,
    taxonomy: &'a CategoryTaxonomy,
    category_gate: bool,
}

// ---------------------------------------------------------------------------
// Pure decision functions
// ---------------------------------------------------------------------------

fn distance_to(event: &Event, reference: Option<GeoPoint>) -> Option<f64> {
    let reference = reference?;
    let location = event.location?;
    Some(haversine_km(reference.lat, reference.lng, location.lat, location.lng))
}

/// Run the gates for one event, in precedence order.
///
/// 1. Bookmarked → keep unconditionally, annotating distance when computable.
/// 2. Starts strictly after the cutoff → reject. No parseable start → pass.
/// 3. Category mismatch → reject (skipped for badge counting).
/// 4. Distance above the limit → reject; missing location data on either
///    side skips the gate.
///
/// Returns the verdict plus the distance to annotate on survivors.
fn judge(event: &Event, bookmarked: bool, ctx: &PassContext<'_>) -> (Verdict, Option<f64>) {
    if bookmarked {
        return (Verdict::Bookmarked, distance_to(event, ctx.reference));
    }

    if event.starts_at.is_some_and(|starts_at| starts_at > ctx.cutoff) {
        return (Verdict::RejectedByTime, None);
    }

    if ctx.category_gate
        && !ctx
            .taxonomy
            .matches(event.category.as_deref(), &ctx.filters.category)
    {
        return (Verdict::RejectedByCategory, None);
    }

    match distance_to(event, ctx.reference) {
        Some(distance) if distance > ctx.filters.max_distance_km => {
            (Verdict::RejectedByDistance, Some(distance))
        }
        distance => (Verdict::Keep, distance),
    }
}

/// Clone a surviving event with its derived distance written (or cleared,
/// so no stale value from an earlier pass leaks through).
fn annotate(event: &Event, distance: Option<f64>) -> Event {
    let mut out = event.clone();
    out.distance_km = distance;
    out
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Orchestrates time-window resolution, taxonomy matching, distance checks,
/// and the bookmark override over a full event set.
pub struct FilterEngine {
    taxonomy: CategoryTaxonomy,
    clock: Arc<dyn Clock>,
    bookmarks: Arc<dyn BookmarkStore>,
    tz: Tz,
}

impl FilterEngine {
    /// Engine on the real wall clock, local to Berlin.
    pub fn new(bookmarks: Arc<dyn BookmarkStore>) -> Self {
        Self::with_clock(bookmarks, Arc::new(SystemClock))
    }

    pub fn with_clock(bookmarks: Arc<dyn BookmarkStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            taxonomy: CategoryTaxonomy::new(),
            clock,
            bookmarks,
            tz: Tz::Europe__Berlin,
        }
    }

    /// Override the timezone that "local" wall-clock cutoffs are computed in.
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.tz = tz;
        self
    }

    pub fn taxonomy(&self) -> &CategoryTaxonomy {
        &self.taxonomy
    }

    /// The currently visible events, in input order, with `distance_km`
    /// populated wherever both the reference and the event location exist.
    pub fn select(
        &self,
        events: &[Event],
        filters: &Filters,
        reference: Option<GeoPoint>,
    ) -> Vec<Event> {
        self.select_with_stats(events, filters, reference).0
    }

    /// `select` plus the per-gate counters for one pass.
    pub fn select_with_stats(
        &self,
        events: &[Event],
        filters: &Filters,
        reference: Option<GeoPoint>,
    ) -> (Vec<Event>, SelectionStats) {
        let ctx = self.pass_context(filters, reference, true);
        let mut stats = SelectionStats {
            total: events.len() as u32,
            ..SelectionStats::default()
        };
        let mut visible = Vec::new();

        for event in events {
            let bookmarked = self.bookmarks.is_bookmarked(event.id);
            if !bookmarked && event.starts_at.is_none() {
                stats.missing_start += 1;
            }

            let (verdict, distance) = judge(event, bookmarked, &ctx);
            match verdict {
                Verdict::Bookmarked => {
                    stats.bookmarked += 1;
                    visible.push(annotate(event, distance));
                }
                Verdict::Keep => {
                    stats.kept += 1;
                    visible.push(annotate(event, distance));
                }
                Verdict::RejectedByTime => stats.rejected_time += 1,
                Verdict::RejectedByCategory => stats.rejected_category += 1,
                Verdict::RejectedByDistance => stats.rejected_distance += 1,
            }
        }

        debug!(
            total = stats.total,
            kept = stats.kept,
            bookmarked = stats.bookmarked,
            rejected_time = stats.rejected_time,
            rejected_category = stats.rejected_category,
            rejected_distance = stats.rejected_distance,
            missing_start = stats.missing_start,
            time_filter = %filters.time_filter,
            "selection pass complete"
        );

        (visible, stats)
    }

    /// Per-category counts for the badge row.
    ///
    /// Applies the bookmark, time, and distance gates exactly as `select`
    /// does, but never the category gate — each badge shows what its own
    /// category would yield, whatever is currently selected. Events without
    /// a category land in the `"uncategorized"` bucket.
    pub fn count_by_category(
        &self,
        events: &[Event],
        filters: &Filters,
        reference: Option<GeoPoint>,
    ) -> HashMap<String, u32> {
        let ctx = self.pass_context(filters, reference, false);
        let mut counts: HashMap<String, u32> = HashMap::new();

        for event in events {
            let bookmarked = self.bookmarks.is_bookmarked(event.id);
            let (verdict, _) = judge(event, bookmarked, &ctx);
            if matches!(verdict, Verdict::Bookmarked | Verdict::Keep) {
                let bucket = event.category.as_deref().unwrap_or(UNCATEGORIZED);
                *counts.entry(bucket.to_string()).or_insert(0) += 1;
            }
        }

        debug!(
            total = events.len(),
            buckets = counts.len(),
            "badge count pass complete"
        );

        counts
    }

    fn pass_context<'a>(
        &'a self,
        filters: &'a Filters,
        reference: Option<GeoPoint>,
        category_gate: bool,
    ) -> PassContext<'a> {
        let now = self.clock.now().with_timezone(&self.tz);
        let cutoff = time_window::resolve(filters.time_filter, now).with_timezone(&Utc);
        PassContext {
            cutoff,
            filters,
            reference,
            taxonomy: &self.taxonomy,
            category_gate,
        }
    }
}

// ===========================================================================
// Unit tests
// ===========================================================================
