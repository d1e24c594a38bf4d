//! Dashboard configuration.
//!
//! The subsystem is configured by its embedding application; there is no
//! config file of its own. Only three knobs exist: the snapshot TTL, the
//! period token forwarded to the analytics endpoints, and the per-source
//! fetch deadline.

use serde::{Deserialize, Serialize};

/// Consider a cached snapshot stale after 5 minutes.
/// Dashboard figures change slowly; this avoids re-running the full fan-out
/// on every screen visit without serving very old numbers.
const DEFAULT_CACHE_TTL_MINUTES: i64 = 5;

/// Window token forwarded verbatim to the analytics endpoints
const DEFAULT_ANALYTICS_PERIOD: &str = "30d";

/// Per-source deadline in seconds. A source slower than this settles as
/// unavailable instead of holding up the whole refresh.
const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub cache_ttl_minutes: i64,
    pub analytics_period: String,
    pub source_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            cache_ttl_minutes: DEFAULT_CACHE_TTL_MINUTES,
            analytics_period: DEFAULT_ANALYTICS_PERIOD.to_string(),
            source_timeout_secs: DEFAULT_SOURCE_TIMEOUT_SECS,
        }
    }
}

impl DashboardConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.cache_ttl_minutes)
    }

    pub fn source_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.source_timeout_secs)
    }
}
