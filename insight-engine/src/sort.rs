use listenboard_core::Record;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Author,
    Subreddit,
    Topic,
    Emotion,
    /// Record category; on practitioner pages this is the practitioner type.
    Category,
    Timestamp,
    Upvotes,
    Intensity,
    Confidence,
}

impl SortColumn {
    pub const ALL_COLUMNS: [SortColumn; 9] = [
        SortColumn::Author,
        SortColumn::Subreddit,
        SortColumn::Topic,
        SortColumn::Emotion,
        SortColumn::Category,
        SortColumn::Timestamp,
        SortColumn::Upvotes,
        SortColumn::Intensity,
        SortColumn::Confidence,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::Author => "Author",
            SortColumn::Subreddit => "Subreddit",
            SortColumn::Topic => "Topic",
            SortColumn::Emotion => "Emotion",
            SortColumn::Category => "Category",
            SortColumn::Timestamp => "Timestamp",
            SortColumn::Upvotes => "Upvotes",
            SortColumn::Intensity => "Intensity",
            SortColumn::Confidence => "Confidence",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Active sort column; `None` keeps filtered (insertion) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub column: Option<SortColumn>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(column: SortColumn, direction: SortDirection) -> Self {
        Self {
            column: Some(column),
            direction,
        }
    }

    /// Header click: the active column flips direction, a new column starts ascending.
    pub fn select(&mut self, column: SortColumn) {
        if self.column == Some(column) {
            self.direction = self.direction.flipped();
        } else {
            self.column = Some(column);
            self.direction = SortDirection::Ascending;
        }
    }
}

fn caseless_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Ascending comparison of two records on one column.
pub fn compare(a: &Record, b: &Record, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Author => caseless_cmp(&a.author, &b.author),
        SortColumn::Subreddit => caseless_cmp(&a.subreddit, &b.subreddit),
        SortColumn::Topic => caseless_cmp(&a.topic, &b.topic),
        SortColumn::Emotion => caseless_cmp(&a.emotion, &b.emotion),
        SortColumn::Category => caseless_cmp(&a.category, &b.category),
        SortColumn::Timestamp => a.hours_ago.cmp(&b.hours_ago),
        SortColumn::Upvotes => a.upvotes.cmp(&b.upvotes),
        SortColumn::Intensity => a.intensity.total_cmp(&b.intensity),
        SortColumn::Confidence => a.confidence.total_cmp(&b.confidence),
    }
}

/// Stable sort of a filtered sequence; equal keys keep their incoming order
/// in both directions.
pub fn sort_records<'a>(mut records: Vec<&'a Record>, state: &SortState) -> Vec<&'a Record> {
    let Some(column) = state.column else {
        return records;
    };
    match state.direction {
        SortDirection::Ascending => records.sort_by(|a, b| compare(a, b, column)),
        SortDirection::Descending => records.sort_by(|a, b| compare(b, a, column)),
    }
    records
}
