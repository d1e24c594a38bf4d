//! Settle-all execution of the secondary analytics fetches.
//!
//! Every registered source runs as its own spawned task with its own
//! deadline; the executor waits for all of them and hands back one outcome
//! slot per source, in registration order. A slow or failing source settles
//! as `Unavailable` in its own slot and cannot abort or delay the verdicts
//! of the others beyond their own completion.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::source::{AnalyticsSource, Settled, SourceOutcome, UnavailableReason};

/// Run all sources concurrently and settle every one of them.
///
/// The returned vector has exactly one entry per source, in input order,
/// regardless of how many calls succeeded.
pub async fn settle_all(
    sources: &[Arc<dyn AnalyticsSource>],
    period: &str,
    deadline: Duration,
) -> Vec<SourceOutcome> {
    let handles: Vec<_> = sources
        .iter()
        .map(|source| {
            let source = Arc::clone(source);
            let period = period.to_string();
            tokio::spawn(async move {
                let kind = source.kind();
                match tokio::time::timeout(deadline, source.fetch(&period)).await {
                    Ok(Ok(payload)) => {
                        debug!(source = %kind, "Analytics source settled");
                        Settled::Success(payload)
                    }
                    Ok(Err(e)) => {
                        warn!(source = %kind, error = %e, "Analytics source failed");
                        Settled::Unavailable(UnavailableReason::Failed(e.to_string()))
                    }
                    Err(_) => {
                        warn!(source = %kind, timeout_ms = deadline.as_millis() as u64, "Analytics source timed out");
                        Settled::Unavailable(UnavailableReason::TimedOut)
                    }
                }
            })
        })
        .collect();

    let settled = join_all(handles).await;

    sources
        .iter()
        .zip(settled)
        .map(|(source, joined)| SourceOutcome {
            kind: source.kind(),
            // A panicked task settles like any other failure
            settled: joined.unwrap_or_else(|e| {
                warn!(source = %source.kind(), error = %e, "Analytics task aborted");
                Settled::Unavailable(UnavailableReason::Failed(format!("task aborted: {}", e)))
            }),
        })
        .collect()
}
