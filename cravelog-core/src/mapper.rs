//! Entity/DTO mapping for craving events
//!
//! [`CravingEventDto`] is the transport shape exchanged with callers
//! outside the storage boundary. Conversions are total, pure, and
//! inverse over the shared field set `{id, text, timestamp,
//! is_archived}`: `dto.into_event()` followed by
//! `CravingEventDto::from_event` yields the original DTO field-for-field.
//! The `analytics_processed` lifecycle flag is internal to the entity
//! and initializes to false when mapping inward.

use crate::types::CravingEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transport shape for a craving event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CravingEventDto {
    /// Unique identifier
    pub id: String,
    /// Free-text content
    pub text: String,
    /// When the craving was logged
    pub timestamp: DateTime<Utc>,
    /// Soft-delete flag
    pub is_archived: bool,
}

impl CravingEventDto {
    /// Map an entity to its transport shape.
    pub fn from_event(event: &CravingEvent) -> Self {
        Self {
            id: event.id.clone(),
            text: event.text.clone(),
            timestamp: event.created_at,
            is_archived: event.is_archived,
        }
    }

    /// Map the transport shape back to an entity.
    ///
    /// All fields are assumed present and well-typed by the caller; the
    /// entity-only `analytics_processed` flag starts false.
    pub fn into_event(self) -> CravingEvent {
        CravingEvent {
            id: self.id,
            text: self.text,
            created_at: self.timestamp,
            is_archived: self.is_archived,
            analytics_processed: false,
        }
    }
}
