//! campstat - Production change reports for pMp campaigns
//!
//! This library provides functionality to:
//! - Cut report windows (week, 30 days, 12/24 weeks, 12 months, per-year monthly)
//!   into boundary timestamps
//! - Sample cumulative pMp event counts at those boundaries
//! - Derive per-bucket growth for every campaign, PWG and priority block
//! - Write one JSON report per window
//!
//! # Examples
//!
//! ```no_run
//! use campstat::{
//!     aggregation::extract_changes,
//!     report::Report,
//!     timezone::TimezoneConfig,
//!     types::CampaignHistories,
//!     windows::{BoundaryGenerator, Window},
//! };
//!
//! # fn example(histories: CampaignHistories) -> campstat::Result<()> {
//! let generator = BoundaryGenerator::new(TimezoneConfig::default().now());
//! let boundaries = generator.boundaries(Window::ThirtyDays)?;
//!
//! let report = Report::assemble(&boundaries, extract_changes(&histories, &boundaries));
//! println!("{}", serde_json::to_string(&report)?);
//! # Ok(())
//! # }
//! ```

pub mod aggregation;
pub mod cli;
pub mod output;
pub mod pipeline;
pub mod report;

pub use campstat_core::{error, provider, timezone, types, windows};

// Re-export commonly used types
pub use error::{CampstatError, Result};
pub use report::{ChangeSet, Report};
pub use types::{CampaignId, EpochMillis, EventRecord, SummaryPoint};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
