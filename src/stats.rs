//! Access statistics and the category datasets charts are drawn from

use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const UNKNOWN: &str = "unknown";

/// Category label to count, kept in first-insertion order.
///
/// Pie and bar charts walk categories in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartDataset {
    counts: IndexMap<String, u64>,
}

impl ChartDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(label, count)` pairs; repeated labels accumulate.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut dataset = Self::new();
        for (label, count) in pairs {
            dataset.add(label, count);
        }
        dataset
    }

    pub fn increment(&mut self, label: impl Into<String>) {
        self.add(label, 1);
    }

    /// Counts saturate at `u64::MAX`
    pub fn add(&mut self, label: impl Into<String>, count: u64) {
        let slot = self.counts.entry(label.into()).or_insert(0);
        *slot = slot.saturating_add(count);
    }

    pub fn get(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().fold(0u64, |sum, count| sum.saturating_add(*count))
    }

    /// Largest count, never below 1 so it is always a safe divisor
    pub fn max_value(&self) -> u64 {
        self.counts.values().copied().max().unwrap_or(0).max(1)
    }

    /// False when empty or when every count is zero
    pub fn has_data(&self) -> bool {
        self.total() > 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(label, count)| (label.as_str(), *count))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.counts.keys().map(String::as_str)
    }
}

/// One access entry as reported by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    /// Broad class: visitor, resident or provider
    #[serde(default, alias = "accessType")]
    pub access_type: Option<String>,
    /// Finer type: frequent, one-time, event, resident...
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AccessRecord {
    pub fn new(access_type: &str, kind: &str, status: &str) -> Self {
        Self {
            access_type: Some(access_type.to_string()),
            kind: Some(kind.to_string()),
            status: Some(status.to_string()),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at.or(self.updated_at)
    }
}

/// Aggregated access counts feeding the statistics dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessStats {
    pub total: u64,
    #[serde(default)]
    pub by_access_type: ChartDataset,
    #[serde(default)]
    pub by_type: ChartDataset,
    #[serde(default)]
    pub by_status: ChartDataset,
    /// Keyed by UTC `YYYY-MM-DD`
    #[serde(default)]
    pub by_date: ChartDataset,
    /// Keyed by hour `"0"`..`"23"` in the reporting offset
    #[serde(default)]
    pub by_hour: ChartDataset,
}

impl AccessStats {
    /// Aggregate records; hours are taken in `offset`.
    pub fn collect(records: &[AccessRecord], offset: FixedOffset) -> Self {
        let mut stats = Self::default();

        for record in records {
            stats.total += 1;
            stats
                .by_access_type
                .increment(label_or_unknown(&record.access_type));
            stats.by_type.increment(label_or_unknown(&record.kind));
            stats.by_status.increment(label_or_unknown(&record.status));

            if let Some(timestamp) = record.timestamp() {
                stats
                    .by_date
                    .increment(timestamp.format("%Y-%m-%d").to_string());
                let hour = timestamp.with_timezone(&offset).hour();
                stats.by_hour.increment(hour.to_string());
            }
        }

        stats
    }

    /// Aggregate with hours in UTC
    pub fn collect_utc(records: &[AccessRecord]) -> Self {
        Self::collect(records, Utc.fix())
    }
}

fn label_or_unknown(label: &Option<String>) -> &str {
    match label.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_dataset_keeps_insertion_order() {
        let mut dataset = ChartDataset::new();
        dataset.increment("resident");
        dataset.increment("visitor");
        dataset.increment("resident");

        let labels: Vec<_> = dataset.labels().collect();
        assert_eq!(labels, vec!["resident", "visitor"]);
        assert_eq!(dataset.get("resident"), 2);
        assert_eq!(dataset.total(), 3);
    }

    #[test]
    fn test_counts_saturate() {
        let mut dataset = ChartDataset::from_pairs([("visitor", u64::MAX), ("resident", 1)]);
        assert_eq!(dataset.total(), u64::MAX);
        assert!(dataset.has_data());

        dataset.add("visitor", 5);
        assert_eq!(dataset.get("visitor"), u64::MAX);
    }

    #[test]
    fn test_max_value_floor() {
        assert_eq!(ChartDataset::new().max_value(), 1);
        let zeros = ChartDataset::from_pairs([("a", 0), ("b", 0)]);
        assert_eq!(zeros.max_value(), 1);
        assert!(!zeros.has_data());
        assert!(!zeros.is_empty());
    }

    #[test]
    fn test_collect_stats() {
        let morning = Utc.with_ymd_and_hms(2024, 5, 1, 9, 15, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 5, 2, 20, 0, 0).unwrap();
        let records = vec![
            AccessRecord::new("visitor", "frequent", "active").at(morning),
            AccessRecord::new("visitor", "one-time", "dentro").at(evening),
            AccessRecord::new("resident", "resident", "active"),
            AccessRecord::default(),
        ];

        let stats = AccessStats::collect_utc(&records);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_access_type.get("visitor"), 2);
        assert_eq!(stats.by_access_type.get("unknown"), 1);
        assert_eq!(stats.by_status.get("active"), 2);
        assert_eq!(stats.by_date.get("2024-05-01"), 1);
        assert_eq!(stats.by_date.get("2024-05-02"), 1);
        assert_eq!(stats.by_hour.get("9"), 1);
        assert_eq!(stats.by_hour.get("20"), 1);
        assert_eq!(stats.by_hour.total(), 2);
    }

    #[test]
    fn test_hour_uses_offset() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 3, 0, 0).unwrap();
        let records = vec![AccessRecord::new("visitor", "event", "active").at(at)];
        let mexico = FixedOffset::west_opt(6 * 3600).unwrap();

        let stats = AccessStats::collect(&records, mexico);

        assert_eq!(stats.by_hour.get("21"), 1);
        // dates stay in UTC
        assert_eq!(stats.by_date.get("2024-05-01"), 1);
    }

    #[test]
    fn test_stats_json_round_trip_keeps_order() {
        let json = r#"{"total":3,"by_access_type":{"visitor":2,"resident":1}}"#;
        let stats: AccessStats = serde_json::from_str(json).unwrap();
        let labels: Vec<_> = stats.by_access_type.labels().collect();
        assert_eq!(labels, vec!["visitor", "resident"]);
        assert!(stats.by_hour.is_empty());
    }
}
