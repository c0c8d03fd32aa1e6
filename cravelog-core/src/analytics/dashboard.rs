//! Dashboard presentation adapter
//!
//! Holds the single piece of observable state a rendering layer reads:
//! the latest [`BasicAnalyticsResult`], absent until the first
//! successful load. Failures degrade gracefully — prior state is kept
//! and the error is recorded on a side channel instead of reaching the
//! renderer.

use std::sync::Mutex;

use tokio::sync::watch;

use super::aggregator::{Aggregator, BasicAnalyticsResult};

/// Observable-state holder between the aggregator and a rendering layer.
///
/// Overlapping `load_analytics` calls are not serialized; the most
/// recently completed call wins. A call cancelled mid-aggregation
/// mutates nothing — the watch value is only replaced after the
/// aggregation future completes.
pub struct DashboardAdapter {
    aggregator: Aggregator,
    stats_tx: watch::Sender<Option<BasicAnalyticsResult>>,
    last_error: Mutex<Option<String>>,
}

impl DashboardAdapter {
    /// Create an adapter over the given aggregator
    pub fn new(aggregator: Aggregator) -> Self {
        let (stats_tx, _) = watch::channel(None);
        Self {
            aggregator,
            stats_tx,
            last_error: Mutex::new(None),
        }
    }

    /// Refresh the observable state.
    ///
    /// Calls the aggregator exactly once. On success the watch value is
    /// replaced; on failure it is left untouched and the error is
    /// recorded in the side channel and logged.
    pub async fn load_analytics(&self) {
        match self.aggregator.basic_stats().await {
            Ok(stats) => {
                *self.last_error.lock().unwrap() = None;
                self.stats_tx.send_replace(Some(stats));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Analytics load failed, keeping previous stats");
                *self.last_error.lock().unwrap() = Some(e.to_string());
            }
        }
    }

    /// The latest successfully loaded snapshot, if any
    pub fn current(&self) -> Option<BasicAnalyticsResult> {
        self.stats_tx.borrow().clone()
    }

    /// Subscribe to snapshot changes
    pub fn subscribe(&self) -> watch::Receiver<Option<BasicAnalyticsResult>> {
        self.stats_tx.subscribe()
    }

    /// Error side channel: the message from the most recent failed
    /// load, cleared by the next successful one
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }
}
