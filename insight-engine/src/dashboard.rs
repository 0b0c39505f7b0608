//! Controller owning the filter, sort and page state of one insight table.
//!
//! All mutation goes through explicit methods; reads return fresh views
//! borrowed from the shared store. Renderers call [`Dashboard::subscribe`]
//! and redraw whenever the revision counter moves.

use crate::aggregate::{insights_report, InsightSummary};
use crate::export::{export_file_name, to_csv, to_json, ExportFormat};
use crate::filter::{apply_filters, FilterState, Selection, Threshold, TimeAnchor, TimeWindow};
use crate::paginate::{page_window, paginate, PageButton, PageState};
use crate::sort::{sort_records, SortColumn, SortState};
use chrono::Utc;
use listenboard_core::{CoreError, DashboardConfig, Record, RecordStore};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView<'a> {
    pub rows: Vec<&'a Record>,
    pub current_page: usize,
    pub total_pages: usize,
    pub range_label: String,
    pub buttons: Vec<PageButton>,
    pub has_previous: bool,
    pub has_next: bool,
    /// Records left after filtering.
    pub visible: usize,
    /// Records in the store.
    pub total: usize,
    pub sort: SortState,
}

#[derive(Debug)]
pub struct Dashboard {
    store: Arc<RecordStore>,
    filters: FilterState,
    sort: SortState,
    page: PageState,
    page_buttons: usize,
    anchor: TimeAnchor,
    revision: watch::Sender<u64>,
}

impl Dashboard {
    pub fn new(store: Arc<RecordStore>, page_size: usize, page_buttons: usize) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            store,
            filters: FilterState::default(),
            sort: SortState::default(),
            page: PageState::new(page_size),
            page_buttons: page_buttons.max(1),
            anchor: TimeAnchor::frozen(),
            revision,
        }
    }

    pub fn from_config(store: Arc<RecordStore>, config: &DashboardConfig) -> Self {
        Self::new(store, config.page_size, config.page_buttons)
    }

    /// Replaces the default frozen-at-load time anchor.
    pub fn with_time_anchor(mut self, anchor: TimeAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn current_page(&self) -> usize {
        self.page.current_page()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn notify(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    fn filters_changed(&mut self) {
        self.page.reset();
        debug!(
            "Filters changed: {} predicates enabled",
            self.filters.enabled_predicates().len()
        );
        self.notify();
    }

    pub fn set_keyword(&mut self, keyword: &str) {
        self.filters.keyword = keyword.to_string();
        self.filters_changed();
    }

    pub fn clear_keyword(&mut self) {
        self.filters.keyword.clear();
        self.filters_changed();
    }

    pub fn toggle_subreddit(&mut self, value: &str) {
        self.filters.subreddits.toggle(value);
        self.filters_changed();
    }

    pub fn toggle_topic(&mut self, value: &str) {
        self.filters.topics.toggle(value);
        self.filters_changed();
    }

    pub fn toggle_emotion(&mut self, value: &str) {
        self.filters.emotions.toggle(value);
        self.filters_changed();
    }

    pub fn toggle_category(&mut self, value: &str) {
        self.filters.categories.toggle(value);
        self.filters_changed();
    }

    /// Single-select emotion dropdown.
    pub fn set_emotion(&mut self, value: &str) {
        self.filters.emotions = Selection::single(value);
        self.filters_changed();
    }

    pub fn set_time_window(&mut self, window: TimeWindow) {
        self.filters.time_window = window;
        self.filters_changed();
    }

    /// Free-text confidence bound such as `"> 0.5"`; unparseable input disables it.
    pub fn set_confidence_input(&mut self, input: &str) {
        self.filters.min_confidence = Threshold::parse(input);
        self.filters_changed();
    }

    /// Slider percentage; 0 disables the bound, values above 100 clamp.
    pub fn set_min_intensity_pct(&mut self, pct: u8) {
        let pct = pct.min(100);
        self.filters.min_intensity = if pct == 0 {
            None
        } else {
            Some(Threshold::at_least(f64::from(pct) / 100.0))
        };
        self.filters_changed();
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.filters_changed();
    }

    pub fn clear_filters(&mut self) {
        self.set_filters(FilterState::default());
    }

    /// Header click; reorders only, the page position is kept (clamped on read).
    pub fn set_sort(&mut self, column: SortColumn) {
        self.sort.select(column);
        self.notify();
    }

    pub fn goto_page(&mut self, page: usize) -> usize {
        let count = self.filtered().len();
        let landed = self.page.goto(page, count);
        self.notify();
        landed
    }

    pub fn next_page(&mut self) -> usize {
        let count = self.filtered().len();
        let landed = self.page.next(count);
        self.notify();
        landed
    }

    pub fn previous_page(&mut self) -> usize {
        let count = self.filtered().len();
        let landed = self.page.previous(count);
        self.notify();
        landed
    }

    /// The filtered and sorted sequence, as handed to exporters.
    pub fn filtered(&self) -> Vec<&Record> {
        let filtered = apply_filters(self.store.records(), &self.filters, self.anchor);
        sort_records(filtered, &self.sort)
    }

    pub fn view(&self) -> DashboardView<'_> {
        let rows = self.filtered();
        let visible = rows.len();
        let page = paginate(&rows, self.page.page_size(), self.page.current_page());
        let buttons = page_window(page.current_page, page.total_pages, self.page_buttons);

        DashboardView {
            range_label: page.range_label(),
            has_previous: page.has_previous(),
            has_next: page.has_next(),
            current_page: page.current_page,
            total_pages: page.total_pages,
            rows: page.items,
            buttons,
            visible,
            total: self.store.len(),
            sort: self.sort,
        }
    }

    /// Summary of the whole store, independent of the current filters.
    pub fn summary(&self) -> InsightSummary {
        InsightSummary::from_store(&self.store)
    }

    /// File name and contents for an export. CSV and JSON carry the current
    /// filtered set; the report covers the whole store.
    pub fn export(&self, format: ExportFormat) -> Result<(String, String), CoreError> {
        let blob = match format {
            ExportFormat::Csv => to_csv(&self.filtered()),
            ExportFormat::Json => to_json(&self.filtered())?,
            ExportFormat::Report => insights_report(&self.store, Utc::now()),
        };
        Ok((export_file_name(self.store.kind(), format), blob))
    }
}
