//! Category taxonomy for the filter bar.
//!
//! A flat group → leaf-categories mapping. The filter bar offers group keys
//! ("music") alongside leaf keys ("rock"); an event tagged with a leaf rolls
//! up into its group for both filtering and badge counts.

use std::collections::HashMap;

/// Filter value that matches every category.
pub const CATEGORY_ALL: &str = "all";

/// Badge bucket for events without a category.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Group key → leaf categories, in filter-bar menu order.
const GROUPS: &[(&str, &[&str])] = &[
    (
        "music",
        &["rock", "pop", "jazz", "electronic", "hip-hop", "classical", "folk"],
    ),
    (
        "sports",
        &["basketball", "football", "running", "cycling", "climbing"],
    ),
    (
        "arts",
        &["theatre", "exhibition", "cinema", "reading", "dance"],
    ),
    ("food", &["street-food", "market", "tasting"]),
    (
        "community",
        &["workshop", "meetup", "flea-market", "festival"],
    ),
];

/// Immutable group lookup, built once at engine construction.
#[derive(Debug, Clone)]
pub struct CategoryTaxonomy {
    groups: HashMap<&'static str, &'static [&'static str]>,
}

impl CategoryTaxonomy {
    pub fn new() -> Self {
        Self {
            groups: GROUPS.iter().copied().collect(),
        }
    }

    /// Whether an event's category satisfies the selected filter category.
    ///
    /// `"all"` matches everything, including events with no category. An
    /// exact match always passes. Otherwise the filter value is read as a
    /// group key and passes iff the event category is one of its leaves;
    /// unknown keys match nothing beyond exact equality.
    pub fn matches(&self, event_category: Option<&str>, filter_category: &str) -> bool {
        if filter_category == CATEGORY_ALL {
            return true;
        }
        let Some(category) = event_category else {
            return false;
        };
        if category == filter_category {
            return true;
        }
        self.groups
            .get(filter_category)
            .is_some_and(|leaves| leaves.iter().any(|leaf| *leaf == category))
    }

    /// Group keys in menu order.
    pub fn groups(&self) -> impl Iterator<Item = &'static str> {
        GROUPS.iter().map(|(group, _)| *group)
    }

    /// Leaf categories of a group, empty for unknown keys.
    pub fn leaves(&self, group: &str) -> &'static [&'static str] {
        self.groups.get(group).copied().unwrap_or(&[])
    }
}

impl Default for CategoryTaxonomy {
    fn default() -> Self {
        Self::new()
    }
}
