//! Analytics module for cravelog
//!
//! Provides aggregate statistics over the persisted craving events:
//! - On-demand basic statistics (counts, trailing-window frequency)
//! - The dashboard adapter exposing them as observable state
//!
//! Snapshots are computed fresh on every request; nothing in this
//! module owns durable state.

pub mod aggregator;
pub mod dashboard;

pub use aggregator::{Aggregator, BasicAnalyticsResult};
pub use dashboard::DashboardAdapter;
