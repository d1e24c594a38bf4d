// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Account status as reported by the roster API.
/// Anything the API sends that we don't recognize parses as `Unknown`
/// and counts as inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudentStatus {
    Active,
    Inactive,
    #[serde(other)]
    #[default]
    Unknown,
}

/// Login account attached to a student record. Holds the status tag
/// and the contact fields tracked for completeness reporting.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserAccount {
    #[serde(default)]
    pub status: StudentStatus,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClassRef {
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SchoolRef {
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// Per-student record counts, delivered by the API under the `_count` key.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RecordCounts {
    #[serde(default)]
    pub attendances: u32,
    #[serde(default)]
    pub grades: u32,
    #[serde(default)]
    pub payments: u32,
    #[serde(default)]
    pub documents: u32,
    #[serde(rename = "bookIssues", default)]
    pub book_issues: u32,
    #[serde(default, alias = "studentTransports")]
    pub transport: u32,
    #[serde(rename = "assignmentSubmissions", default)]
    pub assignment_submissions: u32,
}

/// One student roster record. Immutable once fetched; the aggregation
/// pipeline only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Student {
    pub id: i64,
    #[serde(default)]
    pub user: Option<UserAccount>,
    #[serde(rename = "classId")]
    pub class_id: Option<i64>,
    #[serde(default)]
    pub class: Option<ClassRef>,
    #[serde(default)]
    pub school: Option<SchoolRef>,
    pub caste: Option<String>,
    pub religion: Option<String>,
    #[serde(rename = "bloodGroup")]
    pub blood_group: Option<String>,
    #[serde(rename = "bankAccountNo")]
    pub bank_account_no: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "admissionDate")]
    pub admission_date: Option<NaiveDate>,
    #[serde(rename = "_count", default)]
    pub counts: RecordCounts,
}

/// Label used when a categorical attribute is empty or missing
const NOT_SPECIFIED: &str = "Not Specified";

impl Student {
    pub fn is_active(&self) -> bool {
        self.user
            .as_ref()
            .map(|u| u.status == StudentStatus::Active)
            .unwrap_or(false)
    }

    /// Class label for distributions: class name, then "Class {id}" if only
    /// the foreign key is present, then "Unknown".
    pub fn class_label(&self) -> String {
        if let Some(name) = self.class.as_ref().and_then(|c| c.name.as_deref()) {
            if !name.trim().is_empty() {
                return name.to_string();
            }
        }
        match self.class_id {
            Some(id) => format!("Class {}", id),
            None => "Unknown".to_string(),
        }
    }

    pub fn gender_label(&self) -> String {
        non_empty(self.user.as_ref().and_then(|u| u.gender.as_deref()))
            .unwrap_or(NOT_SPECIFIED)
            .to_string()
    }

    pub fn caste_label(&self) -> String {
        non_empty(self.caste.as_deref())
            .unwrap_or(NOT_SPECIFIED)
            .to_string()
    }

    pub fn religion_label(&self) -> String {
        non_empty(self.religion.as_deref())
            .unwrap_or(NOT_SPECIFIED)
            .to_string()
    }

    pub fn blood_group_label(&self) -> String {
        non_empty(self.blood_group.as_deref())
            .unwrap_or(NOT_SPECIFIED)
            .to_string()
    }

    pub fn school_label(&self) -> String {
        non_empty(self.school.as_ref().and_then(|s| s.name.as_deref()))
            .unwrap_or("Unknown School")
            .to_string()
    }

    /// Admission year label: enrollment timestamp first, admission date as a
    /// fallback, "Unknown" when neither is set.
    pub fn admission_year_label(&self) -> String {
        if let Some(created) = self.created_at {
            return created.year().to_string();
        }
        if let Some(date) = self.admission_date {
            return date.year().to_string();
        }
        "Unknown".to_string()
    }

    pub fn has_email(&self) -> bool {
        non_empty(self.user.as_ref().and_then(|u| u.email.as_deref())).is_some()
    }

    pub fn has_phone(&self) -> bool {
        non_empty(self.user.as_ref().and_then(|u| u.phone.as_deref())).is_some()
    }

    pub fn has_bank_account(&self) -> bool {
        non_empty(self.bank_account_no.as_deref()).is_some()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Page size requested from the roster endpoint. `All` maps to the API's
/// sentinel limit value that disables pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterLimit {
    All,
    Count(u32),
}

impl RosterLimit {
    /// Query-string value understood by the roster endpoint
    pub fn as_query_value(&self) -> String {
        match self {
            RosterLimit::All => "all".to_string(),
            RosterLimit::Count(n) => n.to_string(),
        }
    }
}

/// Pagination metadata returned alongside a roster page
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RosterMeta {
    #[serde(rename = "totalCount", default)]
    pub total_count: usize,
    #[serde(rename = "returnedAll", default)]
    pub returned_all: bool,
}

/// One page of roster records plus pagination metadata
#[derive(Debug, Clone, Default)]
pub struct RosterPage {
    pub students: Vec<Student>,
    pub meta: RosterMeta,
}
