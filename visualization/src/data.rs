//! Turning access statistics into chart-ready series

use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use aicp::{AccessRecord, AccessStats, ChartDataset};

use crate::errors::{Result, VisualizationError};

/// Hours in the hourly chart
pub const HOURS_PER_DAY: usize = 24;

/// One day of the weekly trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub count: u64,
}

/// Series preparation settings
#[derive(Debug, Clone)]
pub struct SeriesPreprocessor {
    /// Most recent days kept in the trend line
    pub max_days: usize,
}

impl Default for SeriesPreprocessor {
    fn default() -> Self {
        Self { max_days: 7 }
    }
}

impl SeriesPreprocessor {
    /// Dated counts sorted ascending, trimmed to the last `max_days`.
    ///
    /// Keys that are not `YYYY-MM-DD` dates are ignored.
    pub fn daily_series(&self, by_date: &ChartDataset) -> Vec<DailyPoint> {
        let mut points: Vec<DailyPoint> = by_date
            .iter()
            .filter_map(|(key, count)| {
                NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d")
                    .ok()
                    .map(|date| DailyPoint { date, count })
            })
            .collect();

        points.sort_by_key(|point| point.date);
        let skip = points.len().saturating_sub(self.max_days);
        points.split_off(skip)
    }

    /// Counts for hours 0..24; unknown hour keys are ignored.
    pub fn hourly_counts(&self, by_hour: &ChartDataset) -> [u64; HOURS_PER_DAY] {
        let mut counts = [0u64; HOURS_PER_DAY];
        for (key, count) in by_hour.iter() {
            if let Ok(hour) = key.trim().parse::<usize>() {
                if hour < HOURS_PER_DAY {
                    counts[hour] = counts[hour].saturating_add(count);
                }
            }
        }
        counts
    }

    /// Hourly counts as a dataset keyed `"0"`..`"23"` in hour order
    pub fn hourly_dataset(&self, by_hour: &ChartDataset) -> ChartDataset {
        ChartDataset::from_pairs(
            self.hourly_counts(by_hour)
                .iter()
                .enumerate()
                .map(|(hour, count)| (hour.to_string(), *count)),
        )
    }
}

/// Input file contents: either precomputed stats or raw access records
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StatsInput {
    Stats(AccessStats),
    Records(Vec<AccessRecord>),
}

/// Load statistics from a JSON file holding either an `AccessStats`
/// object or an array of access records.
pub fn load_stats(path: &Path) -> Result<AccessStats> {
    let json = fs::read_to_string(path)?;
    parse_stats(&json)
}

pub fn parse_stats(json: &str) -> Result<AccessStats> {
    match serde_json::from_str::<StatsInput>(json) {
        Ok(StatsInput::Stats(stats)) => Ok(stats),
        Ok(StatsInput::Records(records)) => Ok(AccessStats::collect_utc(&records)),
        Err(err) => Err(VisualizationError::InvalidData {
            message: format!("expected access stats or a record array: {}", err),
        }),
    }
}

const SAMPLE_ACCESS_TYPES: [&str; 3] = ["visitor", "resident", "provider"];
const SAMPLE_KINDS: [&str; 4] = ["frequent", "one-time", "event", "resident"];
const SAMPLE_STATUSES: [&str; 4] = ["active", "dentro", "salio", "pending"];

/// Generate deterministic access records spread over the `days` before `end`
pub fn sample_records(count: usize, days: i64, end: DateTime<Utc>) -> Vec<AccessRecord> {
    let span_minutes = days.max(1) * 24 * 60;
    (0..count)
        .map(|i| {
            let pick = |seed: usize, len: usize| ((rand_like(seed) * len as f64) as usize).min(len - 1);
            let offset = (rand_like(i * 5 + 1) * span_minutes as f64) as i64;

            AccessRecord::new(
                SAMPLE_ACCESS_TYPES[pick(i * 2 + 1, SAMPLE_ACCESS_TYPES.len())],
                SAMPLE_KINDS[pick(i * 3 + 2, SAMPLE_KINDS.len())],
                SAMPLE_STATUSES[pick(i * 7 + 3, SAMPLE_STATUSES.len())],
            )
            .at(end - Duration::minutes(offset))
        })
        .collect()
}

/// Simple deterministic pseudo-random function for sample data
fn rand_like(seed: usize) -> f64 {
    let x = (seed.wrapping_mul(1103515245).wrapping_add(12345)) & 0x7fff_ffff;
    (x as f64) / (0x7fff_ffff as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_series_sorts_and_keeps_last_week() {
        let by_date = ChartDataset::from_pairs(
            (1..=9)
                .rev()
                .map(|day| (format!("2024-03-{:02}", day), day as u64)),
        );

        let series = SeriesPreprocessor::default().daily_series(&by_date);

        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, date(2024, 3, 3));
        assert_eq!(series[6].date, date(2024, 3, 9));
        assert_eq!(series[6].count, 9);
    }

    #[test]
    fn test_daily_series_skips_bad_keys() {
        let by_date = ChartDataset::from_pairs([("2024-01-02", 1), ("ayer", 4)]);
        let series = SeriesPreprocessor::default().daily_series(&by_date);
        assert_eq!(series, vec![DailyPoint { date: date(2024, 1, 2), count: 1 }]);
    }

    #[test]
    fn test_hourly_counts_fill_every_hour() {
        let by_hour = ChartDataset::from_pairs([("9", 3), ("23", 1), ("24", 7), ("x", 2)]);
        let prep = SeriesPreprocessor::default();

        let counts = prep.hourly_counts(&by_hour);
        assert_eq!(counts[9], 3);
        assert_eq!(counts[23], 1);
        assert_eq!(counts.iter().sum::<u64>(), 4);

        let dataset = prep.hourly_dataset(&by_hour);
        assert_eq!(dataset.len(), 24);
        assert_eq!(dataset.labels().next(), Some("0"));
    }

    #[test]
    fn test_hourly_counts_saturate_on_merged_keys() {
        let by_hour = ChartDataset::from_pairs([("3", u64::MAX), ("03", 1)]);
        let counts = SeriesPreprocessor::default().hourly_counts(&by_hour);
        assert_eq!(counts[3], u64::MAX);
    }

    #[test]
    fn test_parse_stats_accepts_both_shapes() {
        let stats = parse_stats(r#"{"total":2,"by_status":{"active":2}}"#).unwrap();
        assert_eq!(stats.by_status.get("active"), 2);

        let records = parse_stats(
            r#"[{"accessType":"visitor","type":"event","status":"active","created_at":"2024-05-01T10:00:00Z"}]"#,
        )
        .unwrap();
        assert_eq!(records.total, 1);
        assert_eq!(records.by_hour.get("10"), 1);

        assert!(parse_stats("\"nope\"").is_err());
    }

    #[test]
    fn test_sample_records_are_deterministic() {
        let end = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let first = sample_records(50, 7, end);
        let second = sample_records(50, 7, end);

        assert_eq!(first, second);
        assert_eq!(first.len(), 50);
        assert!(first
            .iter()
            .all(|record| record.created_at.is_some_and(|at| at <= end && at >= end - Duration::days(7))));
    }
}
