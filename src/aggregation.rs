//! Aggregation of cumulative snapshots into per-window changes
//!
//! pMp reports cumulative counts at irregular times. For a window we only
//! care about the counts in force at each boundary: the latest snapshot at
//! or before it. [`aggregate_points`] samples series at the boundaries and
//! [`extract_changes`] turns every (campaign, group, block) series into the
//! growth between consecutive boundaries, keeping only series that grew.
//!
//! Boundaries and record times are compared in epoch milliseconds.
//!
//! # Examples
//!
//! ```
//! use campstat::aggregation::aggregate_points;
//! use campstat::types::{EpochMillis, EventRecord};
//!
//! let series = vec![
//!     EventRecord { time: 0.0, done: 1, produced: 0, invalid: 0, expected: 5 },
//!     EventRecord { time: 10.0, done: 3, produced: 0, invalid: 0, expected: 5 },
//! ];
//! let boundaries = [EpochMillis::new(5), EpochMillis::new(15)];
//!
//! let points = aggregate_points([series.as_slice()], &boundaries);
//! assert_eq!(points.iter().map(|p| p.events).collect::<Vec<_>>(), vec![1, 3]);
//! assert_eq!(points.iter().map(|p| p.change).collect::<Vec<_>>(), vec![0, 2]);
//! ```

use crate::report::ChangeSet;
use campstat_core::types::{
    CampaignHistories, EpochMillis, EventCounts, EventRecord, SummaryPoint,
};
use tracing::debug;

/// Sample series at ascending `boundaries` and sum them
///
/// Each series contributes, at every boundary, the counts of its latest
/// record whose time is not after the boundary, or nothing if there is no
/// such record. Records may arrive in any order; among records with equal
/// times the last one in input order wins.
///
/// The first point has a change of 0, every other point the difference of
/// its `events` to the previous point.
pub fn aggregate_points<'a, I>(series: I, boundaries: &[EpochMillis]) -> Vec<SummaryPoint>
where
    I: IntoIterator<Item = &'a [EventRecord]>,
{
    debug_assert!(boundaries.windows(2).all(|pair| pair[0] <= pair[1]));

    let mut totals = vec![EventCounts::default(); boundaries.len()];
    for records in series {
        let mut sorted: Vec<&EventRecord> = records.iter().collect();
        sorted.sort_by(|a, b| a.time.total_cmp(&b.time));

        // Walk boundaries and records in lockstep
        let mut next = 0;
        let mut latest: Option<&EventRecord> = None;
        for (total, boundary) in totals.iter_mut().zip(boundaries) {
            let limit = boundary.as_f64();
            while let Some(record) = sorted.get(next).filter(|r| r.time <= limit) {
                latest = Some(*record);
                next += 1;
            }
            if let Some(record) = latest {
                *total += record.counts();
            }
        }
    }

    let mut points: Vec<SummaryPoint> = Vec::with_capacity(boundaries.len());
    for (boundary, counts) in boundaries.iter().zip(totals) {
        let mut point = SummaryPoint::new(*boundary, counts);
        if let Some(previous) = points.last() {
            point.change = point.events - previous.events;
        }
        points.push(point);
    }

    points
}

/// Growth of one series between consecutive boundaries
///
/// One value per boundary after the first.
pub fn change_series(records: &[EventRecord], boundaries: &[EpochMillis]) -> Vec<i64> {
    aggregate_points([records], boundaries)
        .into_iter()
        .skip(1)
        .map(|point| point.change)
        .collect()
}

/// Change series of every (campaign, group, block) that grew in the window
///
/// A series is kept whole when the sum of its changes is strictly positive
/// and dropped whole otherwise.
pub fn extract_changes(histories: &CampaignHistories, boundaries: &[EpochMillis]) -> ChangeSet {
    let mut changes = ChangeSet::default();
    let mut dropped = 0usize;

    for (campaign, groups) in histories {
        for (group, blocks) in groups {
            for (block, records) in blocks {
                let series = change_series(records, boundaries);
                if series.iter().sum::<i64>() > 0 {
                    changes.insert(campaign, group, block, series);
                } else {
                    dropped += 1;
                }
            }
        }
    }

    debug!(
        "Kept {} series, dropped {} without growth",
        changes.series_count(),
        dropped
    );
    changes
}
