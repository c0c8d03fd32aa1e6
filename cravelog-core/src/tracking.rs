//! Event tracking service
//!
//! Accepts incoming craving events, persists them, and republishes the
//! derived analytics record on a broadcast stream.
//!
//! Delivery policy is at-most-once and best-effort: publishing happens
//! strictly after the durable write, a record tracked while no
//! subscriber is attached is dropped from the stream (there is no
//! replay buffer), and a subscriber that falls behind the channel
//! capacity observes a lag error rather than stalling the tracker.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::broadcast;

use crate::config::TrackingConfig;
use crate::db::Database;
use crate::error::Result;
use crate::types::{AnalyticsRecord, CravingEvent};

/// Tracking statistics
#[derive(Debug, Default, Clone)]
pub struct TrackerStats {
    /// Total events accepted and persisted
    pub events_tracked: usize,
    /// Records delivered to at least one subscriber
    pub records_published: usize,
    /// Records dropped because no subscriber was listening
    pub records_dropped: usize,
}

/// Accepts craving events and fans the derived analytics records out to
/// subscribers.
///
/// The storage handle is injected; the tracker never reaches for
/// ambient global state. Dropping the tracker closes the stream for
/// every subscriber.
pub struct EventTracker {
    db: Arc<Database>,
    sender: broadcast::Sender<AnalyticsRecord>,
    stats: Mutex<TrackerStats>,
}

impl EventTracker {
    /// Create a tracker over the given storage handle
    pub fn new(db: Arc<Database>, config: &TrackingConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            db,
            sender,
            stats: Mutex::new(TrackerStats::default()),
        }
    }

    /// Attach a subscriber to the analytics record stream.
    ///
    /// Only records tracked after this call are observed. When the
    /// tracker is dropped the receiver sees `RecvError::Closed`; a
    /// receiver that overflows the channel capacity sees
    /// `RecvError::Lagged`.
    pub fn subscribe(&self) -> broadcast::Receiver<AnalyticsRecord> {
        self.sender.subscribe()
    }

    /// Number of currently attached subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Track a craving event.
    ///
    /// Validates the event, persists it together with its derived
    /// analytics record, then publishes the record to subscribers.
    /// A persistence failure surfaces as [`crate::Error::Persistence`]
    /// and nothing is published; publish problems never fail the call.
    pub async fn track(&self, event: CravingEvent) -> Result<AnalyticsRecord> {
        event.validate()?;

        self.db.insert_craving(&event)?;

        let record = AnalyticsRecord::for_tracked_event(&event.id, Utc::now());
        self.db.insert_analytics_record(&record)?;

        // Publish only after the durable write
        let mut stats = self.stats.lock().unwrap();
        stats.events_tracked += 1;
        match self.sender.send(record.clone()) {
            Ok(subscribers) => {
                stats.records_published += 1;
                tracing::debug!(
                    craving_id = %event.id,
                    subscribers,
                    "Published analytics record"
                );
            }
            Err(_) => {
                stats.records_dropped += 1;
                tracing::debug!(
                    craving_id = %event.id,
                    "No subscribers attached, analytics record dropped"
                );
            }
        }

        Ok(record)
    }

    /// Get current tracking statistics
    pub fn stats(&self) -> TrackerStats {
        self.stats.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::ActionKind;

    fn test_tracker() -> EventTracker {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        EventTracker::new(Arc::new(db), &TrackingConfig::default())
    }

    #[tokio::test]
    async fn test_track_with_no_subscribers_succeeds() {
        let tracker = test_tracker();

        let record = tracker.track(CravingEvent::new("espresso")).await.unwrap();
        assert_eq!(record.interaction_count, 1);

        let stats = tracker.stats();
        assert_eq!(stats.events_tracked, 1);
        assert_eq!(stats.records_published, 0);
        assert_eq!(stats.records_dropped, 1);
    }

    #[tokio::test]
    async fn test_subscriber_receives_tracked_record() {
        let tracker = test_tracker();
        let mut rx = tracker.subscribe();

        let event = CravingEvent::new("chocolate");
        let craving_id = event.id.clone();
        tracker.track(event).await.unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.craving_id, craving_id);
        assert_eq!(received.actions[0].kind, ActionKind::Logged);

        assert_eq!(tracker.stats().records_published, 1);
    }

    #[tokio::test]
    async fn test_track_persists_event_and_record() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        db.migrate().unwrap();
        let tracker = EventTracker::new(db.clone(), &TrackingConfig::default());

        let event = CravingEvent::new("one more level");
        let craving_id = event.id.clone();
        tracker.track(event).await.unwrap();

        let stored = db.get_craving(&craving_id).unwrap().unwrap();
        assert_eq!(stored.text, "one more level");

        let records = db.list_records_for_craving(&craving_id).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_event_is_rejected_before_storage() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        db.migrate().unwrap();
        let tracker = EventTracker::new(db.clone(), &TrackingConfig::default());

        let err = tracker.track(CravingEvent::new("   ")).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        assert_eq!(db.craving_count().unwrap(), 0);
        assert_eq!(tracker.stats().events_tracked, 0);
    }

    #[tokio::test]
    async fn test_persistence_failure_publishes_nothing() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        db.migrate().unwrap();
        let tracker = EventTracker::new(db.clone(), &TrackingConfig::default());
        let mut rx = tracker.subscribe();

        db.connection()
            .execute_batch("DROP TABLE analytics_records; DROP TABLE cravings;")
            .unwrap();

        let err = tracker.track(CravingEvent::new("doomed")).await.unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));

        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_dropping_tracker_closes_stream() {
        let tracker = test_tracker();
        let mut rx = tracker.subscribe();
        drop(tracker);

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }
}
