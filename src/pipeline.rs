//! End-to-end report generation
//!
//! The run is strictly sequential: list campaigns, fetch each campaign's
//! history one after the other, then build and write one report per
//! window. The source, the boundary generator and the writer are all
//! passed in; nothing is kept in globals.
//!
//! # Examples
//!
//! ```no_run
//! use campstat::output::ReportWriter;
//! use campstat::pipeline::{RunOptions, run};
//! use campstat::timezone::TimezoneConfig;
//! use campstat::windows::{BoundaryGenerator, Window};
//! use campstat_pdmv::{PdmvClient, PdmvConfig};
//! use chrono::Datelike;
//!
//! # async fn example() -> campstat::Result<()> {
//! let now = TimezoneConfig::default().now();
//! let source = PdmvClient::new(PdmvConfig::default())?;
//! let writer = ReportWriter::create("output")?;
//! let options = RunOptions::new(Window::default_set(now.year(), 3));
//!
//! run(&source, &BoundaryGenerator::new(now), &writer, &options).await?;
//! # Ok(())
//! # }
//! ```

use crate::aggregation::extract_changes;
use crate::output::ReportWriter;
use crate::report::Report;
use campstat_core::error::Result;
use campstat_core::provider::HistorySource;
use campstat_core::types::{CampaignHistories, CampaignId};
use campstat_core::windows::{BoundaryGenerator, Window};
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Campaigns picked in debug mode unless configured otherwise
pub const DEFAULT_SAMPLE_SIZE: usize = 15;

/// Settings of one report run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Windows to build reports for, in output order
    pub windows: Vec<Window>,
    /// Pick at most this many random campaigns instead of all of them
    pub sample_size: Option<usize>,
    /// Show a progress bar while fetching
    pub show_progress: bool,
}

impl RunOptions {
    /// Options for all campaigns without a progress bar
    pub fn new(windows: Vec<Window>) -> Self {
        Self {
            windows,
            sample_size: None,
            show_progress: false,
        }
    }

    /// Restrict the run to a random sample of campaigns
    pub fn with_sample_size(mut self, sample_size: Option<usize>) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Enable or disable the fetch progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}

/// Outcome of a run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of campaigns whose history was fetched
    pub campaigns: usize,
    /// Report files written, in window order
    pub written: Vec<PathBuf>,
}

/// Drop repeated identifiers, keeping the first occurrence in place
pub fn dedup_campaigns(campaigns: Vec<CampaignId>) -> Vec<CampaignId> {
    let mut seen = HashSet::new();
    campaigns
        .into_iter()
        .filter(|campaign| seen.insert(campaign.clone()))
        .collect()
}

/// Uniform random sample of at most `size` campaigns, without replacement
pub fn sample_campaigns<R: Rng + ?Sized>(
    mut campaigns: Vec<CampaignId>,
    size: usize,
    rng: &mut R,
) -> Vec<CampaignId> {
    campaigns.shuffle(rng);
    campaigns.truncate(size);
    campaigns
}

/// Campaigns to report on: the source's list, deduplicated, optionally sampled
pub async fn select_campaigns<S: HistorySource + ?Sized>(
    source: &S,
    sample_size: Option<usize>,
) -> Result<Vec<CampaignId>> {
    let listed = source.list_campaigns().await?;
    let total = listed.len();
    let mut campaigns = dedup_campaigns(listed);
    if campaigns.len() != total {
        debug!("Ignoring {} repeated campaigns", total - campaigns.len());
    }

    if let Some(size) = sample_size {
        campaigns = sample_campaigns(campaigns, size, &mut rand::rng());
        info!("Picking {} random campaigns", campaigns.len());
    }

    Ok(campaigns)
}

/// Fetch every campaign's history, one request at a time
pub async fn fetch_histories<S: HistorySource + ?Sized>(
    source: &S,
    campaigns: &[CampaignId],
    show_progress: bool,
) -> Result<CampaignHistories> {
    let progress = if show_progress {
        let pb = ProgressBar::new(campaigns.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        {
            pb.set_style(style);
        }
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let mut histories = CampaignHistories::new();
    for (i, campaign) in campaigns.iter().enumerate() {
        match progress {
            Some(ref pb) => pb.set_message(campaign.to_string()),
            None => info!(
                "Getting {} from pMp, {}/{}",
                campaign,
                i + 1,
                campaigns.len()
            ),
        }

        let history = source.fetch_history(campaign).await?;
        histories.insert(campaign.clone(), history);

        if let Some(ref pb) = progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    info!(
        "Got {} campaigns in {:.2}s",
        histories.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(histories)
}

/// Build the report of every window from already fetched histories
pub fn build_reports(
    histories: &CampaignHistories,
    generator: &BoundaryGenerator,
    windows: &[Window],
) -> Result<Vec<(Window, Report)>> {
    windows
        .iter()
        .map(|&window| -> Result<(Window, Report)> {
            let boundaries = generator.boundaries(window)?;
            let changes = extract_changes(histories, &boundaries);
            Ok((window, Report::assemble(&boundaries, changes)))
        })
        .collect()
}

/// Run the whole pipeline and write one report per window
pub async fn run<S: HistorySource + ?Sized>(
    source: &S,
    generator: &BoundaryGenerator,
    writer: &ReportWriter,
    options: &RunOptions,
) -> Result<RunSummary> {
    let campaigns = select_campaigns(source, options.sample_size).await?;
    let histories = fetch_histories(source, &campaigns, options.show_progress).await?;

    let keys: Vec<String> = options.windows.iter().map(Window::key).collect();
    info!("Timestamp keys: {}", keys.join(", "));

    let mut summary = RunSummary {
        campaigns: histories.len(),
        written: Vec::new(),
    };
    for (window, report) in build_reports(&histories, generator, &options.windows)? {
        if let Some(path) = writer.write(&window.key(), &report)? {
            summary.written.push(path);
        }
    }

    Ok(summary)
}
