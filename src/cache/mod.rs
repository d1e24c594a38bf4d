//! In-process snapshot caching.
//!
//! This module provides the `SnapshotCache` holding the single live
//! `DashboardSnapshot` with its fetch timestamp. Entries are valid for the
//! configured TTL (5 minutes by default) and can be dropped early through
//! explicit invalidation.

pub mod store;

pub use store::SnapshotCache;
