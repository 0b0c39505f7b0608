//! Filter predicates over the record store.
//!
//! A [`FilterState`] holds one value per dimension. Each dimension whose
//! value is not the "all"/empty default contributes one [`Predicate`], and a
//! record is kept only when every enabled predicate admits it.

use chrono::{DateTime, Utc};
use listenboard_core::Record;
use std::fmt;
use tracing::debug;

/// Sentinel a UI sends for "no restriction on this dimension".
pub const ALL: &str = "all";

/// Allowed values for one categorical dimension. `Only` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Only(Vec<String>),
}

impl Selection {
    /// Single-select semantics: `"all"` or a blank value disables the dimension.
    pub fn single(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL {
            Selection::All
        } else {
            Selection::Only(vec![value.to_string()])
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// Selected values as a UI shows them, `["all"]` when unrestricted.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Selection::All => vec![ALL],
            Selection::Only(values) => values.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_selected(&self, value: &str) -> bool {
        match self {
            Selection::All => value == ALL,
            Selection::Only(values) => values.iter().any(|v| v == value),
        }
    }

    /// Checkbox toggle. Choosing `"all"` clears every specific value, choosing a
    /// specific value drops `"all"`, and removing the last specific value
    /// falls back to `"all"`.
    pub fn toggle(&mut self, value: &str) {
        let value = value.trim();
        if value.is_empty() || value == ALL {
            *self = Selection::All;
            return;
        }

        match self {
            Selection::All => *self = Selection::Only(vec![value.to_string()]),
            Selection::Only(values) => {
                if let Some(pos) = values.iter().position(|v| v == value) {
                    values.remove(pos);
                    if values.is_empty() {
                        *self = Selection::All;
                    }
                } else {
                    values.push(value.to_string());
                }
            }
        }
    }

    pub fn admits(&self, field: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(values) => values.iter().any(|v| v == field),
        }
    }
}

/// Lower bound on a unit-interval score, optionally strict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub value: f64,
    pub inclusive: bool,
}

impl Threshold {
    pub fn at_least(value: f64) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    pub fn above(value: f64) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }

    /// Parses `">= 0.3"`, `"=> 0.3"`, `"> 0.5"` or a bare `"0.3"` (inclusive).
    /// Anything else, including `<` bounds, yields `None` and disables the predicate.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let (rest, inclusive) = if let Some(rest) = input
            .strip_prefix(">=")
            .or_else(|| input.strip_prefix("=>"))
        {
            (rest, true)
        } else if let Some(rest) = input.strip_prefix('>') {
            (rest, false)
        } else if input.starts_with(['<', '=']) {
            return None;
        } else {
            (input, true)
        };

        let value: f64 = rest.trim().parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        Some(Self { value, inclusive })
    }

    pub fn admits(&self, score: f64) -> bool {
        if self.inclusive {
            score >= self.value
        } else {
            score > self.value
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = if self.inclusive { ">=" } else { ">" };
        write!(f, "{} {}", op, self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    #[default]
    All,
    PastDay,
    PastWeek,
    PastMonth,
    PastYear,
}

impl TimeWindow {
    pub const ALL_WINDOWS: [TimeWindow; 5] = [
        TimeWindow::All,
        TimeWindow::PastDay,
        TimeWindow::PastWeek,
        TimeWindow::PastMonth,
        TimeWindow::PastYear,
    ];

    /// Unknown bucket names fall back to `All`.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "past_day" => TimeWindow::PastDay,
            "past_week" => TimeWindow::PastWeek,
            "past_month" => TimeWindow::PastMonth,
            "past_year" => TimeWindow::PastYear,
            _ => TimeWindow::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::All => ALL,
            TimeWindow::PastDay => "past_day",
            TimeWindow::PastWeek => "past_week",
            TimeWindow::PastMonth => "past_month",
            TimeWindow::PastYear => "past_year",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::All => "All Time",
            TimeWindow::PastDay => "Past Day",
            TimeWindow::PastWeek => "Past Week",
            TimeWindow::PastMonth => "Past Month",
            TimeWindow::PastYear => "Past Year",
        }
    }

    pub fn max_hours(&self) -> Option<f64> {
        match self {
            TimeWindow::All => None,
            TimeWindow::PastDay => Some(24.0),
            TimeWindow::PastWeek => Some(7.0 * 24.0),
            TimeWindow::PastMonth => Some(30.0 * 24.0),
            TimeWindow::PastYear => Some(365.0 * 24.0),
        }
    }

    pub fn admits(&self, elapsed_hours: f64) -> bool {
        match self.max_hours() {
            Some(max) => elapsed_hours < max,
            None => true,
        }
    }
}

/// Converts a record's hours-ago offset into elapsed time at evaluation.
///
/// `frozen()` evaluates as of store load, so results never drift. `live()`
/// adds the wall-clock time that has passed since load.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeAnchor {
    drift_hours: f64,
}

impl TimeAnchor {
    pub fn frozen() -> Self {
        Self { drift_hours: 0.0 }
    }

    pub fn live(loaded_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let drift = (now - loaded_at).num_seconds().max(0) as f64 / 3600.0;
        Self { drift_hours: drift }
    }

    pub fn elapsed_hours(&self, record: &Record) -> f64 {
        record.hours_ago as f64 + self.drift_hours
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    Keyword,
    Subreddit,
    Topic,
    Emotion,
    Category,
    Intensity,
    Confidence,
    TimeWindow,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterState {
    pub keyword: String,
    pub subreddits: Selection,
    pub topics: Selection,
    pub emotions: Selection,
    pub categories: Selection,
    pub min_intensity: Option<Threshold>,
    pub min_confidence: Option<Threshold>,
    pub time_window: TimeWindow,
}

impl FilterState {
    pub fn enabled_predicates(&self) -> Vec<Predicate> {
        let mut enabled = Vec::new();
        if !self.keyword.trim().is_empty() {
            enabled.push(Predicate::Keyword);
        }
        if !self.subreddits.is_all() {
            enabled.push(Predicate::Subreddit);
        }
        if !self.topics.is_all() {
            enabled.push(Predicate::Topic);
        }
        if !self.emotions.is_all() {
            enabled.push(Predicate::Emotion);
        }
        if !self.categories.is_all() {
            enabled.push(Predicate::Category);
        }
        if self.min_intensity.is_some() {
            enabled.push(Predicate::Intensity);
        }
        if self.min_confidence.is_some() {
            enabled.push(Predicate::Confidence);
        }
        if self.time_window != TimeWindow::All {
            enabled.push(Predicate::TimeWindow);
        }
        enabled
    }

    /// Result of one predicate in isolation. A disabled predicate admits everything.
    pub fn check(&self, predicate: Predicate, record: &Record, anchor: TimeAnchor) -> bool {
        match predicate {
            Predicate::Keyword => keyword_matches(&self.keyword, record),
            Predicate::Subreddit => self.subreddits.admits(&record.subreddit),
            Predicate::Topic => self.topics.admits(&record.topic),
            Predicate::Emotion => self.emotions.admits(&record.emotion),
            Predicate::Category => self.categories.admits(&record.category),
            Predicate::Intensity => self
                .min_intensity
                .map_or(true, |t| t.admits(record.intensity)),
            Predicate::Confidence => self
                .min_confidence
                .map_or(true, |t| t.admits(record.confidence)),
            Predicate::TimeWindow => self.time_window.admits(anchor.elapsed_hours(record)),
        }
    }

    pub fn passes(&self, record: &Record, anchor: TimeAnchor) -> bool {
        self.enabled_predicates()
            .into_iter()
            .all(|predicate| self.check(predicate, record, anchor))
    }
}

fn keyword_matches(keyword: &str, record: &Record) -> bool {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [
        &record.author,
        &record.text,
        &record.full_text,
        &record.insight,
        &record.topic,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Records passing every enabled predicate, in store order.
pub fn apply_filters<'a>(
    records: &'a [Record],
    state: &FilterState,
    anchor: TimeAnchor,
) -> Vec<&'a Record> {
    let filtered: Vec<&Record> = records
        .iter()
        .filter(|record| state.passes(record, anchor))
        .collect();
    debug!(
        "Filter pass kept {}/{} records ({} predicates enabled)",
        filtered.len(),
        records.len(),
        state.enabled_predicates().len()
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_toggle_rules() {
        let mut selection = Selection::default();
        assert!(selection.is_all());

        selection.toggle("r/chronicpain");
        assert_eq!(selection.values(), vec!["r/chronicpain"]);
        assert!(!selection.is_selected(ALL));

        selection.toggle("r/health");
        assert_eq!(selection.values(), vec!["r/chronicpain", "r/health"]);

        selection.toggle("r/chronicpain");
        assert_eq!(selection.values(), vec!["r/health"]);

        // Deselecting the last specific value reverts to "all".
        selection.toggle("r/health");
        assert_eq!(selection, Selection::All);
        assert_eq!(selection.values(), vec![ALL]);

        selection.toggle("r/health");
        selection.toggle("r/wellness");
        selection.toggle(ALL);
        assert_eq!(selection, Selection::All);
    }

    #[test]
    fn test_selection_single() {
        assert_eq!(Selection::single("all"), Selection::All);
        assert_eq!(Selection::single("  "), Selection::All);
        assert_eq!(
            Selection::single("frustrated"),
            Selection::Only(vec!["frustrated".to_string()])
        );
        assert!(Selection::single("frustrated").admits("frustrated"));
        assert!(!Selection::single("frustrated").admits("Frustrated"));
    }

    #[test]
    fn test_threshold_parse() {
        assert_eq!(Threshold::parse(">= 0.3"), Some(Threshold::at_least(0.3)));
        assert_eq!(Threshold::parse("=>0.3"), Some(Threshold::at_least(0.3)));
        assert_eq!(Threshold::parse(">0.5"), Some(Threshold::above(0.5)));
        assert_eq!(Threshold::parse(" 0.7 "), Some(Threshold::at_least(0.7)));
        assert_eq!(Threshold::parse("< 0.8"), None);
        assert_eq!(Threshold::parse("= 0.8"), None);
        assert_eq!(Threshold::parse(">= abc"), None);
        assert_eq!(Threshold::parse(""), None);
        assert_eq!(Threshold::parse(">= NaN"), None);
    }

    #[test]
    fn test_strict_threshold_is_true_strict_comparison() {
        let strict = Threshold::above(0.5);
        assert!(!strict.admits(0.5));
        assert!(strict.admits(0.505));
        assert!(Threshold::at_least(0.5).admits(0.5));
        assert_eq!(strict.to_string(), "> 0.5");
    }

    #[test]
    fn test_time_window_parse_and_bounds() {
        assert_eq!(TimeWindow::parse("past_week"), TimeWindow::PastWeek);
        assert_eq!(TimeWindow::parse("yesterday"), TimeWindow::All);
        assert!(TimeWindow::PastDay.admits(23.0));
        assert!(!TimeWindow::PastDay.admits(24.0));
        assert!(TimeWindow::PastYear.admits(8759.0));
        assert!(TimeWindow::All.admits(1_000_000.0));
        for window in TimeWindow::ALL_WINDOWS {
            assert_eq!(TimeWindow::parse(window.as_str()), window);
        }
    }

    #[test]
    fn test_live_anchor_adds_drift() {
        let loaded_at = DateTime::parse_from_rfc3339("2025-03-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let now = DateTime::parse_from_rfc3339("2025-03-01T06:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let anchor = TimeAnchor::live(loaded_at, now);
        let record = Record {
            id: 1,
            author: "u/a".to_string(),
            timestamp_label: "20 hours ago".to_string(),
            hours_ago: 20,
            subreddit: "r/a".to_string(),
            topic: "sleep".to_string(),
            emotion: "sad".to_string(),
            category: "pain_points".to_string(),
            insight: String::new(),
            text: "t".to_string(),
            full_text: "t".to_string(),
            upvotes: 0,
            intensity: 0.5,
            confidence: 0.5,
            metadata: Default::default(),
        };

        assert_eq!(anchor.elapsed_hours(&record), 26.0);
        assert_eq!(TimeAnchor::frozen().elapsed_hours(&record), 20.0);

        let state = FilterState {
            time_window: TimeWindow::PastDay,
            ..Default::default()
        };
        assert!(state.passes(&record, TimeAnchor::frozen()));
        assert!(!state.passes(&record, anchor));
    }
}
