//! Core domain types for campstat
//!
//! This module contains the fundamental types used throughout campstat:
//! campaign identifiers, epoch-millisecond timestamps, the raw cumulative
//! snapshots reported by pMp, and the summary points derived from them.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign};

/// Strongly-typed campaign identifier (a McM/pMp prepid)
///
/// # Examples
/// ```
/// use campstat_core::types::CampaignId;
///
/// let campaign = CampaignId::new("RunIISummer20UL18RECO");
/// assert_eq!(campaign.as_str(), "RunIISummer20UL18RECO");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(String);

impl CampaignId {
    /// Create a new CampaignId from any string-like type
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CampaignId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Epoch timestamp in milliseconds
///
/// This is the single unit used for comparing boundaries against record
/// times. pMp reports record times in milliseconds, and reports carry the
/// same values in their `timestamps` array.
///
/// # Examples
/// ```
/// use campstat_core::types::EpochMillis;
/// use chrono::{TimeZone, Utc};
///
/// let dt = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let ms = EpochMillis::from_datetime(&dt);
/// assert_eq!(ms.as_i64(), 1_704_067_200_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpochMillis(i64);

impl EpochMillis {
    /// Create from a raw millisecond value
    pub fn new(ms: i64) -> Self {
        Self(ms)
    }

    /// Convert any zoned date-time to epoch milliseconds
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self(dt.timestamp_millis())
    }

    /// Get the raw millisecond value
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Get the value in the unit used by [`EventRecord::time`]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }

    /// Convert back to a UTC date-time, if in range
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl fmt::Display for EpochMillis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cumulative event counts of a request block
///
/// # Examples
/// ```
/// use campstat_core::types::EventCounts;
///
/// let counts = EventCounts::new(100, 50, 10, 500);
/// assert_eq!(counts.events(), 160);
///
/// let combined = counts + EventCounts::new(1, 1, 1, 1);
/// assert_eq!(combined.done, 101);
/// ```
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventCounts {
    /// Events in done requests
    pub done: i64,
    /// Events produced by requests still running
    pub produced: i64,
    /// Events in invalidated requests
    pub invalid: i64,
    /// Events expected once everything is done
    pub expected: i64,
}

impl EventCounts {
    /// Create new EventCounts
    pub fn new(done: i64, produced: i64, invalid: i64, expected: i64) -> Self {
        Self {
            done,
            produced,
            invalid,
            expected,
        }
    }

    /// Events that were actually processed; `expected` is not included
    pub fn events(&self) -> i64 {
        self.done + self.produced + self.invalid
    }
}

impl Add for EventCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            done: self.done + other.done,
            produced: self.produced + other.produced,
            invalid: self.invalid + other.invalid,
            expected: self.expected + other.expected,
        }
    }
}

impl AddAssign for EventCounts {
    fn add_assign(&mut self, other: Self) {
        self.done += other.done;
        self.produced += other.produced;
        self.invalid += other.invalid;
        self.expected += other.expected;
    }
}

/// One cumulative snapshot reported by pMp
///
/// `time` is epoch milliseconds as a float, exactly as pMp sends it. All
/// count fields are required; a record missing one fails to deserialize.
///
/// # Examples
/// ```
/// use campstat_core::types::EventRecord;
///
/// let record: EventRecord = serde_json::from_str(
///     r#"{"time": 1700000000000.0, "done": 5, "produced": 2, "invalid": 0, "expected": 10}"#,
/// ).unwrap();
/// assert_eq!(record.counts().events(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Snapshot time, epoch milliseconds
    pub time: f64,
    pub done: i64,
    pub produced: i64,
    pub invalid: i64,
    pub expected: i64,
}

impl EventRecord {
    /// The counts carried by this snapshot
    pub fn counts(&self) -> EventCounts {
        EventCounts::new(self.done, self.produced, self.invalid, self.expected)
    }
}

/// Aggregated counts at one boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryPoint {
    /// Boundary this point describes
    pub time: EpochMillis,
    pub done: i64,
    pub produced: i64,
    pub invalid: i64,
    pub expected: i64,
    /// `done + produced + invalid`
    pub events: i64,
    /// `events` minus the previous point's `events`, 0 for the first point
    pub change: i64,
}

impl SummaryPoint {
    /// Build a point from summed counts; `change` starts at 0
    pub fn new(time: EpochMillis, counts: EventCounts) -> Self {
        Self {
            time,
            done: counts.done,
            produced: counts.produced,
            invalid: counts.invalid,
            expected: counts.expected,
            events: counts.events(),
            change: 0,
        }
    }
}

/// Records of every sub-block (priority block) of one group
pub type BlockHistory = BTreeMap<String, Vec<EventRecord>>;

/// History of one campaign: group (PWG) -> sub-block -> records
pub type CampaignHistory = BTreeMap<String, BlockHistory>;

/// Histories of every fetched campaign
pub type CampaignHistories = BTreeMap<CampaignId, CampaignHistory>;
