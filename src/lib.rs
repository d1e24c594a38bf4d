//! classpulse - dashboard snapshot cache and multi-source aggregation.
//!
//! Given a student roster endpoint and a set of independent analytics
//! endpoints (each of which may be slow, absent, or failing), this crate:
//!
//! - caches the consolidated dashboard snapshot for a validity window so
//!   repeated reads don't re-run the expensive fan-out
//! - fetches all secondary analytics concurrently, settling every source
//!   individually so one failure never aborts the others
//! - folds the roster plus whatever analytics succeeded into one immutable,
//!   strongly-typed [`DashboardSnapshot`]
//! - supports explicit forced invalidation
//!
//! [`DashboardManager`] is the entry point; rendering and scheduling belong
//! to the embedding application.
//!
//! ```no_run
//! use classpulse::{ApiClient, DashboardConfig, DashboardManager};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut client = ApiClient::new("https://api.example.edu")?;
//! client.set_token("jwt-token".to_string());
//!
//! let dashboard = DashboardManager::from_client(&client, DashboardConfig::default());
//! let snapshot = dashboard.refresh(false).await?;
//! println!("{} students, {} active", snapshot.total_students, snapshot.active_students);
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod api;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod executor;
pub mod models;
pub mod source;

pub use aggregate::aggregate;
pub use api::{ApiClient, ApiError};
pub use cache::SnapshotCache;
pub use config::DashboardConfig;
pub use dashboard::DashboardManager;
pub use executor::settle_all;
pub use models::{
    AnalyticsPayload, ApiAnalytics, DashboardSnapshot, DataCompleteness, RosterLimit, RosterMeta,
    RosterPage, SnapshotMetadata, SourceAvailability, Student, StudentStatus,
};
pub use source::{
    AnalyticsSource, RosterSource, Settled, SourceKind, SourceOutcome, UnavailableReason,
};
