//! Data models for the dashboard pipeline.
//!
//! This module contains all the data structures flowing through a refresh
//! cycle:
//!
//! - `Student`, `UserAccount`, `RecordCounts`: roster records as the API
//!   delivers them
//! - `RosterPage`, `RosterMeta`, `RosterLimit`: roster paging envelope
//! - Analytics payloads: `ConversionAnalytics`, `AttendanceAnalytics`, etc.
//! - `DashboardSnapshot` and its metadata: the aggregation result

pub mod analytics;
pub mod snapshot;
pub mod student;

pub use analytics::{
    AnalyticsPayload, AttendanceAnalytics, ConversionAnalytics, CustomerConversionAnalytics,
    GeneralAnalytics, PaymentAnalytics, TrendPoint,
};
pub use snapshot::{
    ApiAnalytics, DashboardSnapshot, DataCompleteness, SnapshotMetadata, SourceAvailability,
};
pub use student::{
    ClassRef, RecordCounts, RosterLimit, RosterMeta, RosterPage, SchoolRef, Student,
    StudentStatus, UserAccount,
};
