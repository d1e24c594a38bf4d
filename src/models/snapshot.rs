//! The consolidated dashboard snapshot produced by one refresh cycle.
//!
//! A snapshot is immutable once constructed: the aggregator builds a complete
//! value and the cache swaps it in whole, so readers never observe a partial
//! update. Serialized field names stay camelCase for the presentation layer.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analytics::TrendPoint;

/// Analytics block folded from whichever secondary sources succeeded.
/// Fields for an unavailable source keep their zero defaults; consult
/// `SnapshotMetadata::has_api_analytics` to tell "zero" from "missing".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApiAnalytics {
    // Student conversion
    pub conversion_rate: f64,
    pub total_conversions: u64,
    pub conversion_trend: Vec<TrendPoint>,
    // Customer conversion
    pub customer_conversion_rate: f64,
    pub customer_total: u64,
    pub customer_converted: u64,
    pub customer_unconverted: u64,
    // Attendance
    pub attendance_rate: f64,
    pub attendance_trend: Vec<TrendPoint>,
    // Payments
    pub total_revenue: f64,
    pub outstanding_payments: f64,
    pub payment_trend: Vec<TrendPoint>,
    // General engagement report
    pub engagement_score: f64,
    pub performance_score: f64,
    pub satisfaction_score: f64,
}

/// Per-source availability flags for one refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SourceAvailability {
    pub conversion: bool,
    pub customer_conversion: bool,
    pub attendance: bool,
    pub payment: bool,
    pub general: bool,
}

/// Rounded completeness percentages for the tracked contact fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DataCompleteness {
    pub email: u8,
    pub phone: u8,
    pub bank_account: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    /// Generation time of this snapshot; equals the `now` passed to the
    /// aggregator, never read from a clock inside it.
    pub generated_at: DateTime<Utc>,
    pub student_count: usize,
    pub unique_classes: usize,
    pub unique_castes: usize,
    pub unique_religions: usize,
    pub unique_blood_groups: usize,
    pub unique_schools: usize,
    pub has_api_analytics: SourceAvailability,
    pub data_completeness: DataCompleteness,
}

/// Aggregation result for one refresh cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    // Basic counts
    pub total_students: usize,
    pub active_students: usize,
    pub inactive_students: usize,

    // Categorical distributions (value -> occurrence count)
    pub class_distribution: HashMap<String, usize>,
    pub gender_distribution: HashMap<String, usize>,
    pub caste_distribution: HashMap<String, usize>,
    pub religion_distribution: HashMap<String, usize>,
    pub blood_group_distribution: HashMap<String, usize>,
    pub school_distribution: HashMap<String, usize>,
    pub admission_year_distribution: HashMap<String, usize>,

    // Record totals summed across the roster
    pub total_attendance_records: u64,
    pub total_grade_records: u64,
    pub total_payment_records: u64,
    pub total_document_records: u64,
    pub total_book_issues: u64,
    pub total_transport_records: u64,
    pub total_assignment_submissions: u64,

    // Students that have at least one record of a given kind
    pub students_with_attendance: usize,
    pub students_with_grades: usize,
    pub students_with_payments: usize,
    pub students_with_documents: usize,

    // Contact presence counts
    pub students_with_email: usize,
    pub students_with_phone: usize,
    pub students_with_bank_account: usize,

    pub api_analytics: ApiAnalytics,
    pub metadata: SnapshotMetadata,
}
