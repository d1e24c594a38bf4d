//! Pure aggregation of a roster plus settled analytics outcomes into one
//! `DashboardSnapshot`.
//!
//! `aggregate` performs no I/O and carries no hidden clock or randomness:
//! the same roster, outcomes, and `now` always produce the same snapshot.
//! Fields whose source returned nothing stay at their zero defaults and are
//! flagged in `metadata.has_api_analytics` so consumers can tell "zero
//! because no data" from "zero because the source failed".

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{
    AnalyticsPayload, ApiAnalytics, DashboardSnapshot, DataCompleteness, SnapshotMetadata,
    SourceAvailability, Student,
};
use crate::source::SourceOutcome;

/// Fold the roster and the settled secondary outcomes into a snapshot.
/// `now` becomes `metadata.generated_at` verbatim.
pub fn aggregate(
    roster: &[Student],
    outcomes: &[SourceOutcome],
    now: DateTime<Utc>,
) -> DashboardSnapshot {
    let total_students = roster.len();
    let active_students = roster.iter().filter(|s| s.is_active()).count();
    let inactive_students = total_students - active_students;

    let class_distribution = distribution(roster, Student::class_label);
    let gender_distribution = distribution(roster, Student::gender_label);
    let caste_distribution = distribution(roster, Student::caste_label);
    let religion_distribution = distribution(roster, Student::religion_label);
    let blood_group_distribution = distribution(roster, Student::blood_group_label);
    let school_distribution = distribution(roster, Student::school_label);
    let admission_year_distribution = distribution(roster, Student::admission_year_label);

    let total_attendance_records = sum_counts(roster, |c| c.attendances);
    let total_grade_records = sum_counts(roster, |c| c.grades);
    let total_payment_records = sum_counts(roster, |c| c.payments);
    let total_document_records = sum_counts(roster, |c| c.documents);
    let total_book_issues = sum_counts(roster, |c| c.book_issues);
    let total_transport_records = sum_counts(roster, |c| c.transport);
    let total_assignment_submissions = sum_counts(roster, |c| c.assignment_submissions);

    let students_with_attendance = count_where(roster, |s| s.counts.attendances > 0);
    let students_with_grades = count_where(roster, |s| s.counts.grades > 0);
    let students_with_payments = count_where(roster, |s| s.counts.payments > 0);
    let students_with_documents = count_where(roster, |s| s.counts.documents > 0);

    let students_with_email = count_where(roster, Student::has_email);
    let students_with_phone = count_where(roster, Student::has_phone);
    let students_with_bank_account = count_where(roster, Student::has_bank_account);

    let (api_analytics, has_api_analytics) = fold_analytics(outcomes);

    let metadata = SnapshotMetadata {
        generated_at: now,
        student_count: total_students,
        unique_classes: class_distribution.len(),
        unique_castes: caste_distribution.len(),
        unique_religions: religion_distribution.len(),
        unique_blood_groups: blood_group_distribution.len(),
        unique_schools: school_distribution.len(),
        has_api_analytics,
        data_completeness: DataCompleteness {
            email: percentage(students_with_email, total_students),
            phone: percentage(students_with_phone, total_students),
            bank_account: percentage(students_with_bank_account, total_students),
        },
    };

    DashboardSnapshot {
        total_students,
        active_students,
        inactive_students,
        class_distribution,
        gender_distribution,
        caste_distribution,
        religion_distribution,
        blood_group_distribution,
        school_distribution,
        admission_year_distribution,
        total_attendance_records,
        total_grade_records,
        total_payment_records,
        total_document_records,
        total_book_issues,
        total_transport_records,
        total_assignment_submissions,
        students_with_attendance,
        students_with_grades,
        students_with_payments,
        students_with_documents,
        students_with_email,
        students_with_phone,
        students_with_bank_account,
        api_analytics,
        metadata,
    }
}

/// Occurrence count per attribute value. An empty roster yields an empty map.
fn distribution<F>(roster: &[Student], label: F) -> HashMap<String, usize>
where
    F: Fn(&Student) -> String,
{
    let mut counts = HashMap::new();
    for student in roster {
        *counts.entry(label(student)).or_insert(0) += 1;
    }
    counts
}

fn sum_counts<F>(roster: &[Student], field: F) -> u64
where
    F: Fn(&crate::models::RecordCounts) -> u32,
{
    roster.iter().map(|s| u64::from(field(&s.counts))).sum()
}

fn count_where<F>(roster: &[Student], predicate: F) -> usize
where
    F: Fn(&Student) -> bool,
{
    roster.iter().filter(|s| predicate(s)).count()
}

/// Rounded percentage; an empty roster reports 0 rather than dividing by zero
fn percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u8
}

/// Copy successful payloads into the analytics block and flag availability.
/// Unavailable sources leave their fields at zero defaults.
fn fold_analytics(outcomes: &[SourceOutcome]) -> (ApiAnalytics, SourceAvailability) {
    let mut analytics = ApiAnalytics::default();
    let mut available = SourceAvailability::default();

    for outcome in outcomes {
        let Some(payload) = outcome.payload() else {
            continue;
        };
        match payload {
            AnalyticsPayload::Conversion(data) => {
                analytics.conversion_rate = data.conversion_rate;
                analytics.total_conversions = data.total_conversions;
                analytics.conversion_trend = data.conversion_trend.clone();
                available.conversion = true;
            }
            AnalyticsPayload::CustomerConversion(data) => {
                analytics.customer_conversion_rate = data.conversion_rate;
                analytics.customer_total = data.total_customers;
                analytics.customer_converted = data.converted_customers;
                analytics.customer_unconverted = data.unconverted_customers;
                available.customer_conversion = true;
            }
            AnalyticsPayload::Attendance(data) => {
                analytics.attendance_rate = data.average_attendance_rate;
                analytics.attendance_trend = data.attendance_trend.clone();
                available.attendance = true;
            }
            AnalyticsPayload::Payment(data) => {
                analytics.total_revenue = data.total_revenue;
                analytics.outstanding_payments = data.outstanding_amount;
                analytics.payment_trend = data.payment_trend.clone();
                available.payment = true;
            }
            AnalyticsPayload::General(data) => {
                analytics.engagement_score = data.engagement_score;
                analytics.performance_score = data.performance_score;
                analytics.satisfaction_score = data.satisfaction_score;
                available.general = true;
            }
        }
    }

    (analytics, available)
}

// ============================================================================
// Tests
// ============================================================================
