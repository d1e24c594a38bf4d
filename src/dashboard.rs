//! Refresh orchestration for the dashboard snapshot.
//!
//! `DashboardManager` is the public entry point of the pipeline. One refresh
//! cycle runs: cache check, roster fetch, settle-all over the secondary
//! analytics sources, aggregation, cache write. A roster failure aborts the
//! cycle and leaves any previous snapshot in place; secondary failures only
//! degrade the analytics block of the new snapshot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::cache::SnapshotCache;
use crate::config::DashboardConfig;
use crate::executor::settle_all;
use crate::models::{DashboardSnapshot, RosterLimit};
use crate::source::{AnalyticsSource, RosterSource};

pub struct DashboardManager {
    config: DashboardConfig,
    roster: Arc<dyn RosterSource>,
    sources: Vec<Arc<dyn AnalyticsSource>>,
    cache: Mutex<SnapshotCache>,
    /// Serializes refresh cycles; callers that wait here re-check the cache
    /// afterwards instead of repeating the fan-out
    refresh_gate: tokio::sync::Mutex<()>,
}

impl DashboardManager {
    pub fn new(
        roster: Arc<dyn RosterSource>,
        sources: Vec<Arc<dyn AnalyticsSource>>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            config,
            roster,
            sources,
            cache: Mutex::new(SnapshotCache::new()),
            refresh_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Wire a manager to the live API: roster endpoint plus all five
    /// analytics endpoints on the given client
    pub fn from_client(client: &crate::api::ApiClient, config: DashboardConfig) -> Self {
        Self::new(
            Arc::new(client.clone()),
            client.analytics_sources(),
            config,
        )
    }

    /// Return the current snapshot, refreshing it first when the cache is
    /// empty or stale. `forced` drops the cache and always re-fetches.
    ///
    /// Roster failures propagate as errors and leave the cache untouched, so
    /// a failed refresh never wipes stale-but-valid data.
    pub async fn refresh(&self, forced: bool) -> Result<DashboardSnapshot> {
        if !forced {
            if let Some(snapshot) = self.cached_if_valid() {
                debug!("Returning cached snapshot");
                return Ok(snapshot);
            }
        }

        let _gate = self.refresh_gate.lock().await;

        if forced {
            self.cache_guard().invalidate();
        } else if let Some(snapshot) = self.cached_if_valid() {
            // another caller finished a refresh while we waited on the gate
            debug!("Returning snapshot refreshed by concurrent caller");
            return Ok(snapshot);
        }

        let page = self
            .roster
            .fetch_roster(1, RosterLimit::All)
            .await
            .context("Failed to fetch student roster")?;

        debug!(
            students = page.students.len(),
            total = page.meta.total_count,
            returned_all = page.meta.returned_all,
            "Roster fetched, settling analytics sources"
        );

        let outcomes = settle_all(
            &self.sources,
            &self.config.analytics_period,
            self.config.source_timeout(),
        )
        .await;

        let now = Utc::now();
        let snapshot = aggregate(&page.students, &outcomes, now);

        let available = outcomes.iter().filter(|o| o.is_available()).count();
        info!(
            students = snapshot.total_students,
            sources_available = available,
            sources_total = outcomes.len(),
            "Dashboard snapshot refreshed"
        );

        self.cache_guard().put(snapshot.clone(), now);
        Ok(snapshot)
    }

    /// Drop the cached snapshot; the next `refresh` performs a full cycle
    pub fn invalidate(&self) {
        self.cache_guard().invalidate();
    }

    /// True when a cached snapshot exists and is within its TTL
    pub fn is_cache_valid(&self) -> bool {
        self.cache_guard().is_valid(Utc::now(), self.config.ttl())
    }

    /// Current cached snapshot, if any, regardless of TTL
    pub fn cached(&self) -> Option<DashboardSnapshot> {
        self.cache_guard().get().cloned()
    }

    fn cached_if_valid(&self) -> Option<DashboardSnapshot> {
        let cache = self.cache_guard();
        if cache.is_valid(Utc::now(), self.config.ttl()) {
            cache.get().cloned()
        } else {
            None
        }
    }

    /// A poisoned cache mutex only means another thread panicked mid-call;
    /// the store itself is swap-whole, so recover the guard
    fn cache_guard(&self) -> MutexGuard<'_, SnapshotCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::api::ApiError;
    use crate::models::{
        AnalyticsPayload, AttendanceAnalytics, PaymentAnalytics, RosterMeta, RosterPage, Student,
        StudentStatus, UserAccount,
    };
    use crate::source::SourceKind;

    struct MockRoster {
        students: Vec<Student>,
        fail: bool,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl MockRoster {
        fn with_students(count: usize) -> Arc<Self> {
            let students = (0..count)
                .map(|i| Student {
                    id: i as i64,
                    user: Some(UserAccount {
                        status: StudentStatus::Active,
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                .collect();
            Arc::new(Self {
                students,
                fail: false,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                students: Vec::new(),
                fail: true,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn slow(count: usize, delay: Duration) -> Arc<Self> {
            let students = (0..count)
                .map(|i| Student {
                    id: i as i64,
                    ..Default::default()
                })
                .collect();
            Arc::new(Self {
                students,
                fail: false,
                delay,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RosterSource for MockRoster {
        async fn fetch_roster(
            &self,
            _page: u32,
            _limit: RosterLimit,
        ) -> Result<RosterPage, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                return Err(ApiError::ServerError("roster down".to_string()));
            }
            Ok(RosterPage {
                students: self.students.clone(),
                meta: RosterMeta {
                    total_count: self.students.len(),
                    returned_all: true,
                },
            })
        }
    }

    struct MockAnalytics {
        kind: SourceKind,
        fail: bool,
        calls: AtomicUsize,
    }

    impl MockAnalytics {
        fn ok(kind: SourceKind) -> Arc<Self> {
            Arc::new(Self {
                kind,
                fail: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(kind: SourceKind) -> Arc<Self> {
            Arc::new(Self {
                kind,
                fail: true,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl AnalyticsSource for MockAnalytics {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        async fn fetch(&self, _period: &str) -> Result<AnalyticsPayload, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ApiError::ServerError("source down".to_string()));
            }
            Ok(match self.kind {
                SourceKind::Attendance => AnalyticsPayload::Attendance(AttendanceAnalytics {
                    average_attendance_rate: 92.0,
                    ..Default::default()
                }),
                SourceKind::Payment => AnalyticsPayload::Payment(PaymentAnalytics {
                    total_revenue: 5000.0,
                    ..Default::default()
                }),
                _ => AnalyticsPayload::General(Default::default()),
            })
        }
    }

    fn manager(
        roster: Arc<MockRoster>,
        sources: Vec<Arc<MockAnalytics>>,
    ) -> DashboardManager {
        DashboardManager::new(
            roster,
            sources
                .into_iter()
                .map(|s| s as Arc<dyn AnalyticsSource>)
                .collect(),
            DashboardConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_second_refresh_hits_cache() {
        let roster = MockRoster::with_students(3);
        let mgr = manager(Arc::clone(&roster), vec![]);

        let first = mgr.refresh(false).await.unwrap();
        let second = mgr.refresh(false).await.unwrap();

        assert_eq!(roster.calls(), 1);
        assert_eq!(first, second);
        assert!(mgr.is_cache_valid());
    }

    #[tokio::test]
    async fn test_forced_refresh_bypasses_valid_cache() {
        let roster = MockRoster::with_students(2);
        let attendance = MockAnalytics::ok(SourceKind::Attendance);
        let mgr = manager(Arc::clone(&roster), vec![Arc::clone(&attendance)]);

        mgr.refresh(false).await.unwrap();
        assert!(mgr.is_cache_valid());

        mgr.refresh(true).await.unwrap();

        assert_eq!(roster.calls(), 2);
        assert_eq!(attendance.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_roster_failure_preserves_previous_snapshot() {
        let roster = MockRoster::with_students(4);
        let mgr = manager(roster, vec![]);
        let snapshot = mgr.refresh(false).await.unwrap();

        // swap in a failing roster behind a fresh manager sharing the cache
        // is not possible; instead force-expire validity and fail the fetch
        let failing = MockRoster::failing();
        let mgr2 = manager(Arc::clone(&failing), vec![]);
        mgr2.cache_guard().put(snapshot.clone(), Utc::now());

        let err = mgr2.refresh(true).await;
        assert!(err.is_err());
        // forced refresh invalidated before the fetch; non-forced path keeps it
        assert!(mgr2.cached().is_none());

        let mgr3 = manager(failing, vec![]);
        let stale = Utc::now() - chrono::Duration::minutes(10);
        mgr3.cache_guard().put(snapshot.clone(), stale);
        assert!(!mgr3.is_cache_valid());

        let err = mgr3.refresh(false).await;
        assert!(err.is_err());
        assert_eq!(mgr3.cached(), Some(snapshot.clone()));
        assert_eq!(snapshot.total_students, 4);
    }

    #[tokio::test]
    async fn test_single_source_failure_is_isolated() {
        let roster = MockRoster::with_students(1);
        let sources = vec![
            MockAnalytics::ok(SourceKind::Attendance),
            MockAnalytics::failing(SourceKind::Payment),
            MockAnalytics::ok(SourceKind::General),
        ];
        let mgr = manager(roster, sources);

        let snapshot = mgr.refresh(false).await.unwrap();

        assert!(snapshot.metadata.has_api_analytics.attendance);
        assert!(snapshot.metadata.has_api_analytics.general);
        assert!(!snapshot.metadata.has_api_analytics.payment);
        assert_eq!(snapshot.api_analytics.attendance_rate, 92.0);
        assert_eq!(snapshot.api_analytics.total_revenue, 0.0);
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_share_one_fan_out() {
        let roster = MockRoster::slow(2, Duration::from_millis(50));
        let mgr = Arc::new(manager(Arc::clone(&roster), vec![]));

        let a = Arc::clone(&mgr);
        let b = Arc::clone(&mgr);
        let (first, second) = tokio::join!(a.refresh(false), b.refresh(false));

        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(roster.calls(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_next_refresh_to_fetch() {
        let roster = MockRoster::with_students(1);
        let mgr = manager(Arc::clone(&roster), vec![]);

        mgr.refresh(false).await.unwrap();
        mgr.invalidate();
        assert!(!mgr.is_cache_valid());
        assert!(mgr.cached().is_none());

        mgr.refresh(false).await.unwrap();
        assert_eq!(roster.calls(), 2);
    }
}
