//! Event selection and filtering for the stadtpuls map.
//!
//! Given the scraped event set, the filter-bar state, and an optional
//! reference location, decides which events are currently visible and
//! annotates each survivor with its distance from the reference point.
//! The same gate logic backs both the visible set (`FilterEngine::select`)
//! and the per-category badge counts (`FilterEngine::count_by_category`).
//!
//! Everything here is synchronous and pure for a given `now`; the wall
//! clock and the user's bookmarks enter through the traits in [`traits`].

pub mod filter;
pub mod taxonomy;
pub mod time_window;
pub mod traits;

pub use filter::{FilterEngine, Filters, LocationMode, SelectionStats};
pub use taxonomy::{CategoryTaxonomy, CATEGORY_ALL, UNCATEGORIZED};
pub use time_window::TimeFilter;
pub use traits::{BookmarkStore, Clock, FixedClock, NoBookmarks, SystemClock};
