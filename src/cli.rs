//! CLI interface for campstat
//!
//! All configuration comes from command-line flags; the service endpoints
//! can also be set through environment variables.
//!
//! # Example
//!
//! ```bash
//! # Full run, reports in ./output
//! campstat
//!
//! # Quick run over 15 random campaigns, windows anchored in UTC
//! campstat --debug --utc
//!
//! # Rebuild the reports as they would have looked at the start of 2024
//! campstat --anchor 2024-01-01 --output-dir reports-2024
//! ```

use crate::pipeline::DEFAULT_SAMPLE_SIZE;
use campstat_core::error::{CampstatError, Result};
use campstat_core::windows::MAX_YEARS;
use campstat_pdmv::client::{DEFAULT_GRANULARITY, DEFAULT_MCM_URL, DEFAULT_PMP_URL};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::Parser;
use std::path::PathBuf;

/// Build per-window production change reports for pMp campaigns
#[derive(Parser, Debug, Clone)]
#[command(name = "campstat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Only process a random sample of campaigns
    #[arg(long)]
    pub debug: bool,

    /// Number of campaigns sampled in debug mode
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE, requires = "debug")]
    pub sample_size: usize,

    /// Directory the JSON reports are written to
    #[arg(long, short = 'o', default_value = "output")]
    pub output_dir: PathBuf,

    /// Number of calendar years with a monthly report, ending with the current one
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_YEARS)))]
    pub years: u32,

    /// Anchor windows at this local time instead of now (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
    #[arg(long)]
    pub anchor: Option<String>,

    /// Timezone for window boundaries (e.g. "Europe/Zurich", "UTC")
    /// If not specified, uses the system's local timezone
    #[arg(long, short = 'z')]
    pub timezone: Option<String>,

    /// Use UTC for window boundaries (overrides --timezone)
    #[arg(long)]
    pub utc: bool,

    /// McM base URL
    #[arg(long, env = "CAMPSTAT_MCM_URL", default_value = DEFAULT_MCM_URL)]
    pub mcm_url: String,

    /// pMp base URL
    #[arg(long, env = "CAMPSTAT_PMP_URL", default_value = DEFAULT_PMP_URL)]
    pub pmp_url: String,

    /// Number of points pMp samples each history into
    #[arg(long, default_value_t = DEFAULT_GRANULARITY)]
    pub granularity: u32,

    /// Only show warnings and errors
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl Cli {
    /// Sample size to use, if sampling is enabled
    pub fn sample(&self) -> Option<usize> {
        self.debug.then_some(self.sample_size)
    }
}

/// Parse an anchor time given as a date or a date and time
///
/// A bare date means midnight of that day.
pub fn parse_anchor(value: &str) -> Result<NaiveDateTime> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(datetime);
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| {
            CampstatError::InvalidDate(format!(
                "{value}. Use YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS"
            ))
        })
}
