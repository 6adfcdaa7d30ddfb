//! Common test utilities and helpers for campstat tests
//!
//! Provides record builders and an in-memory `HistorySource` so tests never
//! talk to McM or pMp.

#![allow(dead_code)]

use async_trait::async_trait;
use campstat::{
    error::{CampstatError, Result},
    provider::HistorySource,
    types::{CampaignHistory, CampaignId, EpochMillis, EventRecord},
};
use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Common PWGs used across tests
pub const TEST_PWGS: &[&str] = &["B2G", "HIG", "SUS", "TOP"];

/// Common priority blocks used across tests
pub const TEST_BLOCKS: &[&str] = &["block0", "block1", "block2", "block3"];

/// Epoch milliseconds of a UTC date and hour
pub fn utc_ms(year: i32, month: u32, day: u32, hour: u32) -> EpochMillis {
    EpochMillis::from_datetime(&Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap())
}

/// Builder for creating test EventRecord instances
pub struct EventRecordBuilder {
    time: f64,
    done: i64,
    produced: i64,
    invalid: i64,
    expected: i64,
}

impl EventRecordBuilder {
    /// Create a new builder with all counts at zero
    pub fn new() -> Self {
        Self {
            time: 0.0,
            done: 0,
            produced: 0,
            invalid: 0,
            expected: 0,
        }
    }

    pub fn at(mut self, time: EpochMillis) -> Self {
        self.time = time.as_f64();
        self
    }

    pub fn at_raw(mut self, time: f64) -> Self {
        self.time = time;
        self
    }

    pub fn done(mut self, done: i64) -> Self {
        self.done = done;
        self
    }

    pub fn produced(mut self, produced: i64) -> Self {
        self.produced = produced;
        self
    }

    pub fn invalid(mut self, invalid: i64) -> Self {
        self.invalid = invalid;
        self
    }

    pub fn expected(mut self, expected: i64) -> Self {
        self.expected = expected;
        self
    }

    /// Build the EventRecord
    pub fn build(self) -> EventRecord {
        EventRecord {
            time: self.time,
            done: self.done,
            produced: self.produced,
            invalid: self.invalid,
            expected: self.expected,
        }
    }
}

impl Default for EventRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Series of `done` snapshots at the given times
pub fn done_series(points: &[(EpochMillis, i64)]) -> Vec<EventRecord> {
    points
        .iter()
        .map(|&(time, done)| EventRecordBuilder::new().at(time).done(done).build())
        .collect()
}

/// Builder for a campaign's history
#[derive(Default)]
pub struct HistoryBuilder {
    history: CampaignHistory,
}

impl HistoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(mut self, pwg: &str, block: &str, records: Vec<EventRecord>) -> Self {
        self.history
            .entry(pwg.to_string())
            .or_default()
            .insert(block.to_string(), records);
        self
    }

    pub fn build(self) -> CampaignHistory {
        self.history
    }
}

/// In-memory history source
///
/// Campaigns are listed in insertion order, duplicates included, and every
/// fetch is recorded so tests can check what was requested.
#[derive(Default)]
pub struct StaticSource {
    listed: Vec<CampaignId>,
    histories: BTreeMap<CampaignId, CampaignHistory>,
    fetched: Mutex<Vec<CampaignId>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_campaign(mut self, name: &str, history: CampaignHistory) -> Self {
        let id = CampaignId::new(name);
        self.listed.push(id.clone());
        self.histories.insert(id, history);
        self
    }

    /// List a campaign without any history behind it
    pub fn with_listed_only(mut self, name: &str) -> Self {
        self.listed.push(CampaignId::new(name));
        self
    }

    pub fn fetched(&self) -> Vec<CampaignId> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistorySource for StaticSource {
    async fn list_campaigns(&self) -> Result<Vec<CampaignId>> {
        Ok(self.listed.clone())
    }

    async fn fetch_history(&self, campaign: &CampaignId) -> Result<CampaignHistory> {
        self.fetched.lock().unwrap().push(campaign.clone());
        self.histories
            .get(campaign)
            .cloned()
            .ok_or_else(|| CampstatError::InvalidArgument(format!("unknown campaign {campaign}")))
    }
}
