//! Basic statistics aggregation
//!
//! The aggregator reads the non-archived craving events visible at call
//! time and produces a [`BasicAnalyticsResult`] in a single O(n) pass.
//! Events whose age is at most the trailing window count as recent
//! (boundary inclusive); when the recent count meets the configured
//! threshold the snapshot is flagged high-frequency.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::config::AnalyticsConfig;
use crate::db::{CravingFilter, Database};
use crate::error::{Error, Result};

/// Aggregate snapshot computed on demand. Not persisted; has no
/// identity beyond the request that produced it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BasicAnalyticsResult {
    /// Count of all non-archived events
    pub total_events: i64,
    /// Count of events within the trailing window
    pub recent_events: i64,
    /// Whether the recent count meets the high-frequency threshold
    pub high_frequency: bool,
    /// Timestamp of the newest counted event
    pub most_recent_at: Option<DateTime<Utc>>,
    /// When this snapshot was computed
    pub computed_at: DateTime<Utc>,
}

/// Computes basic statistics over the persisted craving events.
pub struct Aggregator {
    db: Arc<Database>,
    window: Duration,
    high_frequency_threshold: u32,
}

impl Aggregator {
    /// Create an aggregator over the given storage handle
    pub fn new(db: Arc<Database>, config: &AnalyticsConfig) -> Self {
        Self {
            db,
            window: Duration::seconds(config.high_frequency_window_secs as i64),
            high_frequency_threshold: config.high_frequency_threshold,
        }
    }

    /// Compute a snapshot relative to the current time.
    pub async fn basic_stats(&self) -> Result<BasicAnalyticsResult> {
        self.basic_stats_at(Utc::now()).await
    }

    /// Compute a snapshot relative to the given reference instant.
    ///
    /// The storage read happens in one repository call, so the pass
    /// observes a consistent set of events. A read failure surfaces as
    /// [`Error::Aggregation`]; callers treat it as "stats unavailable".
    pub async fn basic_stats_at(&self, now: DateTime<Utc>) -> Result<BasicAnalyticsResult> {
        let events = self
            .db
            .list_cravings(&CravingFilter::default())
            .map_err(|e| Error::Aggregation(e.to_string()))?;

        let cutoff = now - self.window;
        let mut total_events = 0i64;
        let mut recent_events = 0i64;
        let mut most_recent_at: Option<DateTime<Utc>> = None;

        for event in &events {
            total_events += 1;
            // Boundary inclusive: an event exactly window-old still counts
            if event.created_at >= cutoff {
                recent_events += 1;
            }
            if most_recent_at.map_or(true, |ts| event.created_at > ts) {
                most_recent_at = Some(event.created_at);
            }
        }

        let high_frequency = recent_events >= self.high_frequency_threshold as i64;

        let result = BasicAnalyticsResult {
            total_events,
            recent_events,
            high_frequency,
            most_recent_at,
            computed_at: Utc::now(),
        };

        tracing::debug!(
            total = result.total_events,
            recent = result.recent_events,
            high_frequency = result.high_frequency,
            "Computed basic analytics snapshot"
        );

        // Lifecycle marker only; the snapshot above is already complete,
        // so a marking failure is logged rather than surfaced
        let unprocessed: Vec<String> = events
            .iter()
            .filter(|e| !e.analytics_processed)
            .map(|e| e.id.clone())
            .collect();
        if !unprocessed.is_empty() {
            if let Err(e) = self.db.mark_analytics_processed(&unprocessed) {
                tracing::warn!(error = %e, "Failed to mark events as analytics-processed");
            }
        }

        Ok(result)
    }
}
