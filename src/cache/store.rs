use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::models::DashboardSnapshot;

/// In-process store for the single live dashboard snapshot.
///
/// Holds at most one entry. Invariant: when `populated` is false the
/// snapshot is `None` and `fetched_at` sits at the epoch. The store itself
/// is not synchronized; the owning `DashboardManager` keeps it behind a
/// mutex so get/put/invalidate stay atomic with respect to each other.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    snapshot: Option<DashboardSnapshot>,
    fetched_at: Option<DateTime<Utc>>,
    populated: bool,
}

impl SnapshotCache {
    /// Create an empty store; `is_valid` is false until the first `put`
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff populated and the entry is younger than `ttl` at `now`
    pub fn is_valid(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match (self.populated, self.fetched_at) {
            (true, Some(fetched_at)) => now - fetched_at < ttl,
            _ => false,
        }
    }

    pub fn get(&self) -> Option<&DashboardSnapshot> {
        self.snapshot.as_ref()
    }

    /// Store a snapshot, stamping it with `now`
    pub fn put(&mut self, snapshot: DashboardSnapshot, now: DateTime<Utc>) {
        debug!(students = snapshot.total_students, "Snapshot cached");
        self.snapshot = Some(snapshot);
        self.fetched_at = Some(now);
        self.populated = true;
    }

    /// Drop the entry entirely; the next refresh must repopulate
    pub fn invalidate(&mut self) {
        debug!("Snapshot cache invalidated");
        self.snapshot = None;
        self.fetched_at = None;
        self.populated = false;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    use crate::aggregate::aggregate;

    fn snapshot() -> DashboardSnapshot {
        aggregate(&[], &[], Utc.with_ymd_and_hms(2026, 8, 27, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_empty_store_is_never_valid() {
        let cache = SnapshotCache::new();
        assert!(!cache.is_valid(Utc::now(), Duration::minutes(5)));
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_put_makes_entry_valid_within_ttl() {
        let mut cache = SnapshotCache::new();
        let now = Utc::now();
        cache.put(snapshot(), now);

        assert!(cache.is_valid(now, Duration::minutes(5)));
        assert!(cache.get().is_some());
    }

    #[test]
    fn test_entry_expires_past_ttl() {
        let mut cache = SnapshotCache::new();
        let fetched = Utc::now();
        cache.put(snapshot(), fetched);

        let later = fetched + Duration::minutes(6);
        assert!(!cache.is_valid(later, Duration::minutes(5)));
        // expired, not invalidated: the stale snapshot is still readable
        assert!(cache.get().is_some());
    }

    #[test]
    fn test_ttl_boundary_is_exclusive() {
        let mut cache = SnapshotCache::new();
        let fetched = Utc::now();
        cache.put(snapshot(), fetched);

        // exactly ttl old: no longer valid (strictly-less-than window)
        assert!(!cache.is_valid(fetched + Duration::minutes(5), Duration::minutes(5)));
        assert!(cache.is_valid(
            fetched + Duration::minutes(5) - Duration::seconds(1),
            Duration::minutes(5)
        ));
    }

    #[test]
    fn test_invalidate_clears_everything() {
        let mut cache = SnapshotCache::new();
        let now = Utc::now();
        cache.put(snapshot(), now);
        cache.invalidate();

        assert!(cache.get().is_none());
        assert!(!cache.is_valid(now, Duration::minutes(5)));
        assert!(!cache.populated);
        assert!(cache.fetched_at.is_none());
    }

    #[test]
    fn test_put_replaces_previous_entry() {
        let mut cache = SnapshotCache::new();
        let first = Utc::now();
        cache.put(snapshot(), first);

        let second = first + Duration::minutes(10);
        cache.put(snapshot(), second);

        // refreshed entry is valid again relative to the new stamp
        assert!(cache.is_valid(second, Duration::minutes(5)));
    }
}
