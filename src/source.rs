//! Fetch interfaces for the roster and secondary analytics sources.
//!
//! Both traits describe exactly one network capability each: a single fetch
//! with no retry or aggregation logic. The orchestrator talks to these traits
//! only, so tests and alternate backends can stand in for the live API.

use async_trait::async_trait;

use crate::api::ApiError;
use crate::models::{AnalyticsPayload, RosterLimit, RosterPage};

/// The five secondary analytics endpoints the dashboard folds in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Conversion,
    CustomerConversion,
    Attendance,
    Payment,
    General,
}

impl SourceKind {
    /// Short name used in logs
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Conversion => "conversion",
            SourceKind::CustomerConversion => "customer-conversion",
            SourceKind::Attendance => "attendance",
            SourceKind::Payment => "payment",
            SourceKind::General => "general",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Primary data source: the student roster
#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn fetch_roster(&self, page: u32, limit: RosterLimit) -> Result<RosterPage, ApiError>;
}

/// One secondary analytics source. `period` is an opaque window token
/// (e.g. "30d") forwarded to the endpoint as-is.
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    fn kind(&self) -> SourceKind;
    async fn fetch(&self, period: &str) -> Result<AnalyticsPayload, ApiError>;
}

/// Why a secondary source produced no payload this cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// The source did not answer within its deadline
    TimedOut,
    /// The fetch returned an error (captured as display text)
    Failed(String),
}

/// Terminal outcome of one secondary fetch. Failures never cross this
/// boundary as errors; they settle into `Unavailable`.
#[derive(Debug, Clone, PartialEq)]
pub enum Settled {
    Success(AnalyticsPayload),
    Unavailable(UnavailableReason),
}

/// Outcome slot for one source, as produced by the settle-all executor
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOutcome {
    pub kind: SourceKind,
    pub settled: Settled,
}

impl SourceOutcome {
    pub fn is_available(&self) -> bool {
        matches!(self.settled, Settled::Success(_))
    }

    pub fn payload(&self) -> Option<&AnalyticsPayload> {
        match &self.settled {
            Settled::Success(payload) => Some(payload),
            Settled::Unavailable(_) => None,
        }
    }
}
