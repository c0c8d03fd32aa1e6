//! # cravelog-core
//!
//! Core library for cravelog - a local craving tracker.
//!
//! This library provides:
//! - Domain types for craving events and analytics records
//! - Database storage layer with SQLite
//! - An event tracking service with a broadcast stream
//! - On-demand analytics aggregation and a dashboard adapter
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! Craving events flow in through the tracking service, which persists
//! them and republishes the derived analytics record to subscribers.
//! The aggregator reads the persisted events on demand and produces a
//! statistics snapshot; the dashboard adapter holds the latest snapshot
//! as observable state for a rendering layer. The storage handle is
//! injected into every component that needs it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cravelog_core::{Aggregator, Config, CravingEvent, Database, EventTracker};
//!
//! # async fn run() -> cravelog_core::Result<()> {
//! let config = Config::load()?;
//! let db = Arc::new(Database::open(&Config::database_path())?);
//! db.migrate()?;
//!
//! let tracker = EventTracker::new(db.clone(), &config.tracking);
//! tracker.track(CravingEvent::new("late night snack")).await?;
//!
//! let aggregator = Aggregator::new(db, &config.analytics);
//! let stats = aggregator.basic_stats().await?;
//! println!("{} cravings logged", stats.total_events);
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{Aggregator, BasicAnalyticsResult, DashboardAdapter};
pub use config::Config;
pub use db::{CravingFilter, Database};
pub use error::{Error, Result, ValidationError};
pub use mapper::CravingEventDto;
pub use tracking::{EventTracker, TrackerStats};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod mapper;
pub mod tracking;
pub mod types;
