use campstat::{
    aggregation::{aggregate_points, extract_changes},
    report::Report,
    types::{CampaignHistories, CampaignHistory, CampaignId, EpochMillis, EventRecord},
    windows::{BoundaryGenerator, Window},
};
use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const HOUR_MS: i64 = 3_600_000;

fn anchor() -> chrono::DateTime<Tz> {
    Tz::UTC.with_ymd_and_hms(2024, 3, 13, 10, 30, 0).unwrap()
}

/// Hourly cumulative snapshots going back from the anchor, newest first
fn create_series(count: usize) -> Vec<EventRecord> {
    let end = Utc.with_ymd_and_hms(2024, 3, 13, 0, 0, 0).unwrap().timestamp_millis();

    (0..count)
        .map(|i| {
            let done = (count - i) as i64 * 100;
            EventRecord {
                time: (end - i as i64 * HOUR_MS) as f64,
                done,
                produced: done / 10,
                invalid: (i % 7) as i64,
                expected: count as i64 * 120,
            }
        })
        .collect()
}

fn create_histories(campaigns: usize, records_per_block: usize) -> CampaignHistories {
    let mut histories = CampaignHistories::new();
    for c in 0..campaigns {
        let mut history = CampaignHistory::new();
        for pwg in ["B2G", "HIG", "SUS", "TOP"] {
            let blocks = history.entry(pwg.to_string()).or_default();
            for block in 0..4 {
                blocks.insert(format!("block{block}"), create_series(records_per_block));
            }
        }
        histories.insert(CampaignId::new(format!("Campaign{c}")), history);
    }
    histories
}

fn benchmark_aggregate_points(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_points");
    let boundaries = BoundaryGenerator::new(anchor())
        .boundaries(Window::TwentyFourWeeks)
        .unwrap();

    for size in [100, 1_000, 10_000] {
        let series = create_series(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &series, |b, series| {
            b.iter(|| aggregate_points([black_box(series.as_slice())], black_box(&boundaries)));
        });
    }

    group.finish();
}

fn benchmark_extract_changes(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_changes");
    group.sample_size(10);

    let generator = BoundaryGenerator::new(anchor());
    let histories = create_histories(50, 500);

    for window in [Window::Week, Window::ThirtyDays, Window::TwelveMonths] {
        let boundaries = generator.boundaries(window).unwrap();
        group.bench_function(window.key(), |b| {
            b.iter(|| extract_changes(black_box(&histories), black_box(&boundaries)));
        });
    }

    group.finish();
}

fn benchmark_report_serialization(c: &mut Criterion) {
    let boundaries: Vec<EpochMillis> = BoundaryGenerator::new(anchor())
        .boundaries(Window::ThirtyDays)
        .unwrap();
    let report = Report::assemble(&boundaries, extract_changes(&create_histories(50, 500), &boundaries));

    c.bench_function("serialize_report", |b| {
        b.iter(|| serde_json::to_vec(black_box(&report)).unwrap());
    });
}

criterion_group!(
    benches,
    benchmark_aggregate_points,
    benchmark_extract_changes,
    benchmark_report_serialization
);
criterion_main!(benches);
