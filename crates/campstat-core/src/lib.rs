//! Core types, traits, and utilities for campstat
//!
//! This crate provides the foundational types, error handling,
//! timezone configuration, report windows, and the history source
//! trait used by all other campstat crates.

pub mod error;
pub mod provider;
pub mod timezone;
pub mod types;
pub mod windows;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use error::{CampstatError, Result};
pub use provider::HistorySource;
pub use types::{
    CampaignHistories, CampaignHistory, CampaignId, EpochMillis, EventCounts, EventRecord,
    SummaryPoint,
};
pub use windows::{BoundaryGenerator, Window};
