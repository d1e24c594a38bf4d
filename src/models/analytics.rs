//! Payload types for the secondary analytics endpoints.
//!
//! Every field is `#[serde(default)]` so a payload with missing or null
//! sub-fields still parses; absent values fold into the snapshot as zeros
//! rather than failing the refresh cycle.

use serde::{Deserialize, Serialize};

/// One point of a time-series returned by an analytics endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TrendPoint {
    pub date: String,
    pub value: f64,
}

/// Student conversion analytics (inquiry-to-enrollment funnel)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversionAnalytics {
    pub conversion_rate: f64,
    pub total_conversions: u64,
    pub conversion_trend: Vec<TrendPoint>,
}

/// Customer (prospective family) conversion analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerConversionAnalytics {
    pub conversion_rate: f64,
    pub total_customers: u64,
    pub converted_customers: u64,
    pub unconverted_customers: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AttendanceAnalytics {
    pub average_attendance_rate: f64,
    pub attendance_trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct PaymentAnalytics {
    pub total_revenue: f64,
    pub outstanding_amount: f64,
    pub payment_trend: Vec<TrendPoint>,
}

/// General engagement report from the reports endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneralAnalytics {
    pub engagement_score: f64,
    pub performance_score: f64,
    pub satisfaction_score: f64,
}

/// Tagged union over the payloads the five secondary sources can return.
/// The aggregator folds each variant into its own slice of `ApiAnalytics`.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyticsPayload {
    Conversion(ConversionAnalytics),
    CustomerConversion(CustomerConversionAnalytics),
    Attendance(AttendanceAnalytics),
    Payment(PaymentAnalytics),
    General(GeneralAnalytics),
}
