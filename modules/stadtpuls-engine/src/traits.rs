//! Trait seams for the engine's external capabilities.
//!
//! The clock and the bookmark store are the only two things the engine
//! cannot compute from its inputs. Both are injected so tests can pin
//! `now` and bookmark state without touching global state.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Supplies the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a fixed instant, for deterministic cutoffs in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Read-only view of the user's bookmarked events.
///
/// Owned by a persistence collaborator; the engine only ever asks, never
/// mutates.
pub trait BookmarkStore: Send + Sync {
    fn is_bookmarked(&self, id: Uuid) -> bool;
}

/// Bookmark store with nothing bookmarked.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBookmarks;

impl BookmarkStore for NoBookmarks {
    fn is_bookmarked(&self, _id: Uuid) -> bool {
        false
    }
}

impl BookmarkStore for std::collections::HashSet<Uuid> {
    fn is_bookmarked(&self, id: Uuid) -> bool {
        self.contains(&id)
    }
}
