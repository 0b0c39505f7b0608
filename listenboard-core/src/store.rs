//! The immutable in-memory record store.
//!
//! Records are loaded once from seed data, get their ids assigned in load
//! order, and are never mutated afterwards. Every view derived from the
//! store (filtered, sorted, paginated) borrows from it.

use crate::error::{CoreError, DatasetError};
use crate::types::{InsightKind, Record, RecordMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

pub const DEFAULT_EMOTION: &str = "neutral";
pub const DEFAULT_TOPIC: &str = "general";

/// A record as it appears in a seed file, before ids and derived fields are filled in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedRecord {
    pub author: String,
    #[serde(default)]
    pub timestamp_label: Option<String>,
    #[serde(default)]
    pub hours_ago: u32,
    pub subreddit: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub topic_scores: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub emotion_scores: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub intensity: Option<f64>,
    /// Practitioner seeds name this field `practitioner_type`.
    #[serde(default, alias = "practitioner_type")]
    pub category: String,
    #[serde(default)]
    pub insight: String,
    pub text: String,
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub metadata: RecordMetadata,
}

#[derive(Debug)]
pub struct RecordStore {
    kind: InsightKind,
    records: Vec<Record>,
    loaded_at: DateTime<Utc>,
}

impl RecordStore {
    pub fn load(kind: InsightKind, seeds: Vec<SeedRecord>) -> Result<Self, CoreError> {
        Self::load_at(kind, seeds, Utc::now())
    }

    /// Loads seeds with an explicit load instant, which anchors time-window filtering.
    pub fn load_at(
        kind: InsightKind,
        seeds: Vec<SeedRecord>,
        loaded_at: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        let records = seeds
            .into_iter()
            .enumerate()
            .map(|(index, seed)| seed.into_record(index))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Loaded {} {} records at {}",
            records.len(),
            kind.slug(),
            loaded_at
        );

        Ok(Self {
            kind,
            records,
            loaded_at,
        })
    }

    pub fn from_json_str(kind: InsightKind, json: &str) -> Result<Self, CoreError> {
        let seeds: Vec<SeedRecord> = serde_json::from_str(json)?;
        Self::load(kind, seeds)
    }

    pub fn from_json_file(kind: InsightKind, path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Err(DatasetError::SeedNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        debug!("Reading seed records from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(kind, &json)
    }

    pub fn kind(&self) -> InsightKind {
        self.kind
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

impl SeedRecord {
    fn into_record(self, index: usize) -> Result<Record, DatasetError> {
        if self.text.trim().is_empty() {
            return Err(DatasetError::EmptyField {
                field: "text".to_string(),
                index,
            });
        }

        let (emotion, scored_intensity) = match (self.emotion, &self.emotion_scores) {
            (Some(emotion), _) => (emotion, None),
            (None, Some(scores)) => match dominant_label(scores) {
                Some((label, score)) => (label, Some(score)),
                None => (DEFAULT_EMOTION.to_string(), None),
            },
            (None, None) => (DEFAULT_EMOTION.to_string(), None),
        };
        let intensity = self.intensity.or(scored_intensity).unwrap_or(0.0);
        check_unit_score("intensity", intensity)?;
        check_unit_score("confidence", self.confidence)?;

        let topic = self
            .topic
            .or_else(|| {
                self.topic_scores
                    .as_ref()
                    .and_then(dominant_label)
                    .map(|(label, _)| label)
            })
            .unwrap_or_else(|| DEFAULT_TOPIC.to_string());

        let timestamp_label = self
            .timestamp_label
            .unwrap_or_else(|| relative_time_label(self.hours_ago));
        let full_text = self.full_text.unwrap_or_else(|| self.text.clone());

        Ok(Record {
            id: index as u64 + 1,
            author: self.author,
            timestamp_label,
            hours_ago: self.hours_ago,
            subreddit: self.subreddit,
            topic,
            emotion,
            category: self.category,
            insight: self.insight,
            text: self.text,
            full_text,
            upvotes: self.upvotes,
            intensity,
            confidence: self.confidence,
            metadata: self.metadata,
        })
    }
}

fn check_unit_score(field: &str, value: f64) -> Result<(), DatasetError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(DatasetError::ScoreOutOfRange {
            field: field.to_string(),
            value,
        })
    }
}

/// Highest-scoring label of a score map. Ties keep the alphabetically first label.
pub fn dominant_label(scores: &BTreeMap<String, f64>) -> Option<(String, f64)> {
    let mut best: Option<(&String, f64)> = None;
    for (label, &score) in scores {
        if !score.is_finite() {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((label, score)),
        }
    }
    best.map(|(label, score)| (label.clone(), score))
}

/// Human-readable age such as "3 hours ago", with 30-day months and 365-day years.
pub fn relative_time_label(hours_ago: u32) -> String {
    const DAY: u32 = 24;
    let (count, unit) = match hours_ago {
        0 => return "just now".to_string(),
        h if h < DAY => (h, "hour"),
        h if h < DAY * 7 => (h / DAY, "day"),
        h if h < DAY * 30 => (h / (DAY * 7), "week"),
        h if h < DAY * 365 => (h / (DAY * 30), "month"),
        h => (h / (DAY * 365), "year"),
    };
    let plural = if count > 1 { "s" } else { "" };
    format!("{} {}{} ago", count, unit, plural)
}
