//! "At a glance" statistics computed from the whole record store.
//!
//! Everything here takes a [`RecordStore`] rather than a filtered slice, so
//! the panels it feeds stay constant while the table filters change.

use chrono::{DateTime, Utc};
use listenboard_core::{Record, RecordStore};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Subreddit,
    Topic,
    Emotion,
    Category,
}

impl Dimension {
    fn value<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            Dimension::Subreddit => &record.subreddit,
            Dimension::Topic => &record.topic,
            Dimension::Emotion => &record.emotion,
            Dimension::Category => &record.category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Share {
    pub value: String,
    pub count: usize,
    pub percentage: u32,
}

/// `count` as a whole percentage of `total`, rounding halves up.
pub fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count * 200 + total) / (total * 2)) as u32
}

/// Frequency of each value of `dimension`, most common first. Ties keep the
/// order in which values first appear in the store.
pub fn share_by(store: &RecordStore, dimension: Dimension) -> Vec<Share> {
    let records = store.records();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for record in records {
        let value = dimension.value(record);
        match index.get(value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(value, count)| Share {
            value: value.to_string(),
            count,
            percentage: percentage(count, records.len()),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightSummary {
    pub total: usize,
    pub top_categories: Vec<Share>,
    pub emotions: Vec<Share>,
    pub mean_intensity: f64,
}

impl InsightSummary {
    pub const TOP_CATEGORIES: usize = 3;

    pub fn from_store(store: &RecordStore) -> Self {
        let mut top_categories = share_by(store, Dimension::Category);
        top_categories.truncate(Self::TOP_CATEGORIES);

        let mean_intensity = if store.is_empty() {
            0.0
        } else {
            store.records().iter().map(|r| r.intensity).sum::<f64>() / store.len() as f64
        };

        Self {
            total: store.len(),
            top_categories,
            emotions: share_by(store, Dimension::Emotion),
            mean_intensity,
        }
    }
}

/// "pain_points" -> "Pain Points"
pub fn humanize(value: &str) -> String {
    value
        .split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plain-text insights report over the whole store.
pub fn insights_report(store: &RecordStore, generated_at: DateTime<Utc>) -> String {
    let categories = share_by(store, Dimension::Category);
    let emotions = share_by(store, Dimension::Emotion);
    let mut report = String::new();

    let _ = writeln!(report, "{} Insights Report", store.kind().title());
    let _ = writeln!(report);
    let _ = writeln!(report, "Most expressed categories:");
    for share in &categories {
        let _ = writeln!(
            report,
            "- {}: {}% of comments relate to {}",
            humanize(&share.value),
            share.percentage,
            humanize(&share.value).to_lowercase()
        );
    }
    let _ = writeln!(report);
    let themes: Vec<String> = emotions.iter().map(|s| humanize(&s.value)).collect();
    let _ = writeln!(report, "Common themes:");
    let _ = writeln!(report, "{}", themes.join(", "));
    let _ = writeln!(report);
    let _ = writeln!(report, "Sentiment breakdown:");
    for share in &emotions {
        let _ = writeln!(report, "{}: {}%", humanize(&share.value), share.percentage);
    }
    let _ = writeln!(report);
    let _ = writeln!(report, "Generated on: {}", generated_at.format("%Y-%m-%d"));
    let _ = write!(report, "Total entries analyzed: {}", store.len());
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_rounds_half_up() {
        assert_eq!(percentage(1, 8), 13); // 12.5
        assert_eq!(percentage(3, 8), 38); // 37.5
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(8, 8), 100);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("pain_points"), "Pain Points");
        assert_eq!(humanize("desires-wishes"), "Desires Wishes");
        assert_eq!(humanize("frustrated"), "Frustrated");
        assert_eq!(humanize(""), "");
    }
}
