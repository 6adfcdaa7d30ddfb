//! Per-window report structure
//!
//! A [`Report`] is what ends up in `<window>.json`:
//!
//! ```json
//! {
//!   "timestamps": [1704067200000, ...],
//!   "data": {"<campaign>": {"<pwg>": {"<block>": [12, 0, 40, ...]}}},
//!   "pwgs": ["HIG", ...],
//!   "blocks": ["block1", ...]
//! }
//! ```
//!
//! Maps and sets are ordered, so the same input always serializes to the
//! same bytes.

use campstat_core::error::Result;
use campstat_core::types::{CampaignId, EpochMillis};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Change series of surviving blocks: campaign -> group -> block -> changes
pub type ChangeData = BTreeMap<CampaignId, BTreeMap<String, BTreeMap<String, Vec<i64>>>>;

/// Number of (campaign, group, block) series in `data`
fn count_series(data: &ChangeData) -> usize {
    data.values()
        .flat_map(|groups| groups.values())
        .map(|blocks| blocks.len())
        .sum()
}

/// Surviving series of one window plus the groups and blocks they use
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub data: ChangeData,
    pub pwgs: BTreeSet<String>,
    pub blocks: BTreeSet<String>,
}

impl ChangeSet {
    /// Record a kept series and mark its group and block as used
    pub fn insert(&mut self, campaign: &CampaignId, group: &str, block: &str, changes: Vec<i64>) {
        self.data
            .entry(campaign.clone())
            .or_default()
            .entry(group.to_string())
            .or_default()
            .insert(block.to_string(), changes);
        self.pwgs.insert(group.to_string());
        self.blocks.insert(block.to_string());
    }

    /// Number of kept (campaign, group, block) series
    pub fn series_count(&self) -> usize {
        count_series(&self.data)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Report of one window, serialized as one JSON file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Window boundaries, epoch milliseconds
    pub timestamps: Vec<EpochMillis>,
    /// Changes per boundary after the first
    pub data: ChangeData,
    /// Groups with at least one series in `data`
    pub pwgs: BTreeSet<String>,
    /// Block names with at least one series in `data`
    pub blocks: BTreeSet<String>,
}

impl Report {
    /// Combine a window's boundaries with its surviving series
    pub fn assemble(boundaries: &[EpochMillis], changes: ChangeSet) -> Self {
        let ChangeSet { data, pwgs, blocks } = changes;
        Self {
            timestamps: boundaries.to_vec(),
            data,
            pwgs,
            blocks,
        }
    }

    /// The report as a JSON value
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Number of (campaign, group, block) series in the report
    pub fn series_count(&self) -> usize {
        count_series(&self.data)
    }
}
