use serde::{Deserialize, Serialize};

/// Which insight page a record store was seeded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    PainPoints,
    FailedSolutions,
    DesiresWishes,
    Triggers,
    Questions,
    Metaphors,
    Practitioners,
    Comments,
}

impl InsightKind {
    /// Prefix used when naming exported files.
    pub fn slug(&self) -> &'static str {
        match self {
            InsightKind::PainPoints => "painpoints",
            InsightKind::FailedSolutions => "failed-solutions",
            InsightKind::DesiresWishes => "desires-wishes",
            InsightKind::Triggers => "triggers",
            InsightKind::Questions => "questions",
            InsightKind::Metaphors => "metaphors",
            InsightKind::Practitioners => "practitioners",
            InsightKind::Comments => "comments",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            InsightKind::PainPoints => "Pain Points",
            InsightKind::FailedSolutions => "Failed Solutions",
            InsightKind::DesiresWishes => "Desires & Wishes",
            InsightKind::Triggers => "Triggers",
            InsightKind::Questions => "Questions",
            InsightKind::Metaphors => "Metaphors",
            InsightKind::Practitioners => "Practitioner References",
            InsightKind::Comments => "Comments",
        }
    }
}

/// Display-only auxiliary fields. Never consulted by filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    #[serde(default)]
    pub post_title: Option<String>,
    #[serde(default)]
    pub post_url: Option<String>,
    #[serde(default)]
    pub comment_count: u32,
}

/// One comment or question in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub author: String,
    pub timestamp_label: String,
    /// Hours between posting and store load; only used for ordering and time windows.
    pub hours_ago: u32,
    pub subreddit: String,
    pub topic: String,
    pub emotion: String,
    pub category: String,
    /// The phrase extracted for this page (pain point, trigger, question, ...).
    pub insight: String,
    pub text: String,
    pub full_text: String,
    pub upvotes: u32,
    pub intensity: f64,
    pub confidence: f64,
    pub metadata: RecordMetadata,
}
