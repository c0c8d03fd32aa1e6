//! Core domain types for cravelog
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Craving event** | A user-logged occurrence with free-text content and a timestamp |
//! | **Analytics record** | Derived telemetry tied to one craving event (interaction count, action log) |
//! | **Recorded action** | One enumerated action the user took, with its time |
//!
//! Craving events are the source of truth; analytics records are derived
//! at tracking time and read-only thereafter. Aggregate snapshots live in
//! [`crate::analytics`].

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================
// Craving events
// ============================================

/// A user-logged craving occurrence.
///
/// Created by the caller on user action. `is_archived` flips to true on
/// soft-delete; `analytics_processed` flips to true once the aggregator
/// has incorporated the event into a computed statistic. The processed
/// flag is a lifecycle marker only — aggregation never skips events
/// based on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CravingEvent {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Free-text content; must be non-empty at validation time
    pub text: String,
    /// When the craving was logged
    pub created_at: DateTime<Utc>,
    /// Soft-delete flag
    pub is_archived: bool,
    /// Set once the aggregator has counted this event
    pub analytics_processed: bool,
}

impl CravingEvent {
    /// Create a new craving event with a fresh id and the current time.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            created_at: Utc::now(),
            is_archived: false,
            analytics_processed: false,
        }
    }

    /// Check the content invariant.
    ///
    /// Fails with [`ValidationError::EmptyText`] when the text is empty
    /// or whitespace-only after trimming. No side effects.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyText);
        }
        Ok(())
    }
}

// ============================================
// Recorded actions
// ============================================

/// Kind of user action captured in an analytics record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// The craving was logged
    Logged,
    /// The craving was viewed in a list or detail surface
    Viewed,
    /// The user marked the craving as resisted
    Resisted,
    /// The craving was archived
    Archived,
}

impl ActionKind {
    /// Returns the identifier used in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Logged => "logged",
            ActionKind::Viewed => "viewed",
            ActionKind::Resisted => "resisted",
            ActionKind::Archived => "archived",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logged" => Ok(ActionKind::Logged),
            "viewed" => Ok(ActionKind::Viewed),
            "resisted" => Ok(ActionKind::Resisted),
            "archived" => Ok(ActionKind::Archived),
            _ => Err(format!("unknown action kind: {}", s)),
        }
    }
}

/// One user action with its time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordedAction {
    /// What the user did
    pub kind: ActionKind,
    /// When they did it
    pub at: DateTime<Utc>,
}

// ============================================
// Analytics records
// ============================================

/// Derived telemetry for one craving event.
///
/// Created by the tracking service when an event is recorded, read-only
/// thereafter. The `craving_id` back-reference is non-owning and
/// lookup-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Originating craving event id
    pub craving_id: String,
    /// When the record was created
    pub recorded_at: DateTime<Utc>,
    /// Non-negative interaction counter
    pub interaction_count: u32,
    /// Ordered action log
    pub actions: Vec<RecordedAction>,
}

impl AnalyticsRecord {
    /// Create a record for a freshly tracked craving: one interaction,
    /// a single `logged` action stamped at the given time.
    pub fn for_tracked_event(craving_id: &str, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            craving_id: craving_id.to_string(),
            recorded_at: at,
            interaction_count: 1,
            actions: vec![RecordedAction {
                kind: ActionKind::Logged,
                at,
            }],
        }
    }
}
