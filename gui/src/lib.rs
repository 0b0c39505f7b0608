use iced::widget::{
    button, column, container, horizontal_space, row, scrollable, slider, text, text_input,
    Column, Row,
};
use iced::{Command, Element, Length, Theme};
use insight_engine::{
    share_by, Dashboard, DashboardView, Dimension, ExportFormat, PageButton, SortColumn,
    SortDirection, SortState, TimeWindow, ALL,
};
use listenboard_core::{ChatError, CoreError, ErrorExt, ErrorReporter, Record};
use llm_interface::{ChatAssistant, SubmitOutcome, Submission};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum Message {
    KeywordChanged(String),
    EmotionSelected(String),
    TimeWindowSelected(TimeWindow),
    ConfidenceChanged(String),
    IntensityChanged(u8),
    ClearFilters,
    SortBy(SortColumn),
    GotoPage(usize),
    NextPage,
    PreviousPage,
    Export(ExportFormat),
    ChatInputChanged(String),
    ChatSubmit,
    ChatFinished(SubmitOutcome),
}

/// Owned copy of the visible page, rebuilt only when the dashboard revision moves.
#[derive(Debug, Clone, PartialEq)]
struct TableSnapshot {
    rows: Vec<Record>,
    current_page: usize,
    range_label: String,
    buttons: Vec<PageButton>,
    has_previous: bool,
    has_next: bool,
    visible: usize,
    sort: SortState,
}

impl From<DashboardView<'_>> for TableSnapshot {
    fn from(view: DashboardView<'_>) -> Self {
        Self {
            rows: view.rows.into_iter().cloned().collect(),
            current_page: view.current_page,
            range_label: view.range_label,
            buttons: view.buttons,
            has_previous: view.has_previous,
            has_next: view.has_next,
            visible: view.visible,
            sort: view.sort,
        }
    }
}

pub struct App {
    dashboard: Dashboard,
    assistant: Arc<ChatAssistant>,
    revision: watch::Receiver<u64>,
    table: TableSnapshot,
    table_rebuilds: usize,
    keyword: String,
    confidence_input: String,
    intensity_pct: u8,
    chat_input: String,
    status: Option<String>,
    reporter: ErrorReporter,
}

impl App {
    pub fn new(dashboard: Dashboard, assistant: Arc<ChatAssistant>) -> Self {
        let revision = dashboard.subscribe();
        let table = TableSnapshot::from(dashboard.view());
        Self {
            dashboard,
            assistant,
            revision,
            table,
            table_rebuilds: 1,
            keyword: String::new(),
            confidence_input: String::new(),
            intensity_pct: 0,
            chat_input: String::new(),
            status: None,
            reporter: ErrorReporter::new(),
        }
    }

    pub fn title(&self) -> String {
        format!("Listenboard - {}", self.dashboard.store().kind().title())
    }

    pub fn update(&mut self, message: Message) -> Command<Message> {
        let command = match message {
            Message::KeywordChanged(keyword) => {
                self.dashboard.set_keyword(&keyword);
                self.keyword = keyword;
                Command::none()
            }
            Message::EmotionSelected(emotion) => {
                self.dashboard.set_emotion(&emotion);
                Command::none()
            }
            Message::TimeWindowSelected(window) => {
                self.dashboard.set_time_window(window);
                Command::none()
            }
            Message::ConfidenceChanged(input) => {
                self.dashboard.set_confidence_input(&input);
                self.confidence_input = input;
                Command::none()
            }
            Message::IntensityChanged(pct) => {
                self.dashboard.set_min_intensity_pct(pct);
                self.intensity_pct = pct;
                Command::none()
            }
            Message::ClearFilters => {
                self.dashboard.clear_filters();
                self.keyword.clear();
                self.confidence_input.clear();
                self.intensity_pct = 0;
                Command::none()
            }
            Message::SortBy(column) => {
                self.dashboard.set_sort(column);
                Command::none()
            }
            Message::GotoPage(page) => {
                self.dashboard.goto_page(page);
                Command::none()
            }
            Message::NextPage => {
                self.dashboard.next_page();
                Command::none()
            }
            Message::PreviousPage => {
                self.dashboard.previous_page();
                Command::none()
            }
            Message::Export(format) => {
                self.status = Some(match self.export(format) {
                    Ok(file_name) => format!("Exported {}", file_name),
                    Err(e) => {
                        self.reporter.report_error(&e);
                        e.user_friendly_message()
                    }
                });
                Command::none()
            }
            Message::ChatInputChanged(input) => {
                self.chat_input = input;
                Command::none()
            }
            Message::ChatSubmit => self.submit_chat(),
            Message::ChatFinished(outcome) => {
                debug!("Chat cycle finished: {:?}", outcome);
                self.status = None;
                Command::none()
            }
        };

        self.refresh_table();
        command
    }

    fn refresh_table(&mut self) {
        if !self.revision.has_changed().unwrap_or(false) {
            return;
        }
        let revision = *self.revision.borrow_and_update();
        self.table = TableSnapshot::from(self.dashboard.view());
        self.table_rebuilds += 1;
        debug!("Table rebuilt for dashboard revision {}", revision);
    }

    fn export(&self, format: ExportFormat) -> Result<String, CoreError> {
        let (file_name, blob) = self.dashboard.export(format)?;
        std::fs::write(&file_name, blob)?;
        info!("Wrote {} ({})", file_name, format.content_type());
        Ok(file_name)
    }

    fn submit_chat(&mut self) -> Command<Message> {
        let input = std::mem::take(&mut self.chat_input);
        match self.assistant.begin(&input) {
            Submission::Ready(request) => {
                let assistant = Arc::clone(&self.assistant);
                Command::perform(
                    async move {
                        let result = assistant.dispatch(request).await;
                        assistant.finish(result)
                    },
                    Message::ChatFinished,
                )
            }
            Submission::Busy => {
                let busy = CoreError::from(ChatError::Busy);
                self.reporter.report_warning(&busy);
                self.status = Some(busy.user_friendly_message());
                self.chat_input = input;
                Command::none()
            }
            Submission::Ignored => Command::none(),
        }
    }

    pub fn view(&self) -> Element<Message, Theme> {
        let title: Element<Message, Theme> = text(self.title()).size(24).into();

        let main_content: Element<Message, Theme> = row![
            column![self.filters_view(), self.table_view(), self.summary_view()]
                .spacing(20)
                .width(Length::FillPortion(3)),
            self.chat_view(),
        ]
        .spacing(20)
        .into();

        let mut layout = column![title].spacing(20);
        if let Some(status) = &self.status {
            layout = layout.push(text(status).size(12));
        }

        container(layout.push(main_content))
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(20)
            .into()
    }

    fn filters_view(&self) -> Element<Message, Theme> {
        let filters = self.dashboard.filters();

        let mut emotions = Row::new().spacing(5).push(text("Emotion:").size(14));
        let mut choices = vec![ALL.to_string()];
        choices.extend(
            share_by(self.dashboard.store(), Dimension::Emotion)
                .into_iter()
                .map(|share| share.value),
        );
        for emotion in choices {
            let selected = filters.emotions.is_selected(&emotion);
            emotions = emotions.push(
                button(text(&emotion).size(12))
                    .on_press_maybe((!selected).then(|| Message::EmotionSelected(emotion.clone()))),
            );
        }

        let mut windows = Row::new().spacing(5).push(text("Time:").size(14));
        for window in TimeWindow::ALL_WINDOWS {
            windows = windows.push(
                button(text(window.label()).size(12)).on_press_maybe(
                    (filters.time_window != window).then_some(Message::TimeWindowSelected(window)),
                ),
            );
        }

        column![
            row![
                text_input("Search comments...", &self.keyword)
                    .on_input(Message::KeywordChanged)
                    .width(Length::FillPortion(2)),
                text_input("Confidence, e.g. >= 0.7", &self.confidence_input)
                    .on_input(Message::ConfidenceChanged)
                    .width(Length::FillPortion(1)),
                button("Clear filters").on_press(Message::ClearFilters),
            ]
            .spacing(10),
            row![
                text(format!("Min intensity: {}%", self.intensity_pct)).size(14),
                slider(0..=100, self.intensity_pct, Message::IntensityChanged),
            ]
            .spacing(10),
            emotions,
            windows,
        ]
        .spacing(10)
        .into()
    }

    fn table_view(&self) -> Element<Message, Theme> {
        let view = &self.table;

        let mut header = Row::new().spacing(5);
        for column in SortColumn::ALL_COLUMNS {
            let marker = match (view.sort.column == Some(column), view.sort.direction) {
                (true, SortDirection::Ascending) => " ^",
                (true, SortDirection::Descending) => " v",
                (false, _) => "",
            };
            header = header.push(
                button(text(format!("{}{}", column.label(), marker)).size(12))
                    .on_press(Message::SortBy(column))
                    .width(Length::FillPortion(1)),
            );
        }

        let mut rows = Column::new().spacing(5);
        if view.rows.is_empty() {
            rows = rows.push(text("No records match the current filters").size(14));
        }
        for record in &view.rows {
            rows = rows.push(record_row(record));
        }

        let mut pager = Row::new()
            .spacing(5)
            .push(text(format!("Showing {} of {}", view.range_label, view.visible)).size(12))
            .push(horizontal_space())
            .push(button("Previous").on_press_maybe(view.has_previous.then_some(Message::PreviousPage)));
        for page_button in &view.buttons {
            pager = match *page_button {
                PageButton::Number(page) => pager.push(
                    button(text(page.to_string()).size(12))
                        .on_press_maybe((page != view.current_page).then_some(Message::GotoPage(page))),
                ),
                PageButton::Ellipsis => pager.push(text("...").size(12)),
            };
        }
        pager = pager
            .push(button("Next").on_press_maybe(view.has_next.then_some(Message::NextPage)))
            .push(button("CSV").on_press(Message::Export(ExportFormat::Csv)))
            .push(button("JSON").on_press(Message::Export(ExportFormat::Json)))
            .push(button("Report").on_press(Message::Export(ExportFormat::Report)));

        column![header, scrollable(rows).height(Length::Fill), pager]
            .spacing(10)
            .height(Length::FillPortion(3))
            .into()
    }

    fn summary_view(&self) -> Element<Message, Theme> {
        let summary = self.dashboard.summary();

        let mut panel = Column::new()
            .spacing(5)
            .push(text(format!("At a glance: {} entries", summary.total)).size(16));
        for share in &summary.top_categories {
            panel = panel.push(
                text(format!(
                    "{}: {}%",
                    insight_engine::humanize(&share.value),
                    share.percentage
                ))
                .size(12),
            );
        }
        let emotions: Vec<String> = summary
            .emotions
            .iter()
            .map(|share| format!("{} {}%", share.value, share.percentage))
            .collect();
        panel = panel.push(text(emotions.join("  ")).size(12));

        container(panel).padding(10).into()
    }

    fn chat_view(&self) -> Element<Message, Theme> {
        let mut history = Column::new().spacing(8);
        for message in self.assistant.messages() {
            let who = if message.is_from_user { "You" } else { "Assistant" };
            history = history.push(
                column![
                    text(format!("{} - {}", who, message.sent_at.format("%H:%M"))).size(11),
                    text(message.text).size(13),
                ]
                .spacing(2),
            );
        }

        let sending = self.assistant.is_sending();
        let mut input = text_input("Ask about the data...", &self.chat_input);
        if !sending {
            input = input
                .on_input(Message::ChatInputChanged)
                .on_submit(Message::ChatSubmit);
        }

        column![
            text("AI Assistant").size(18),
            scrollable(history).height(Length::Fill),
            row![
                input,
                button(if sending { "Sending..." } else { "Send" })
                    .on_press_maybe((!sending).then_some(Message::ChatSubmit)),
            ]
            .spacing(5),
        ]
        .spacing(10)
        .width(Length::FillPortion(1))
        .into()
    }
}

fn record_row<'a>(record: &Record) -> Element<'a, Message, Theme> {
    row![
        text(&record.author).size(12).width(Length::FillPortion(1)),
        text(&record.subreddit).size(12).width(Length::FillPortion(1)),
        text(&record.topic).size(12).width(Length::FillPortion(1)),
        text(&record.emotion).size(12).width(Length::FillPortion(1)),
        text(&record.category).size(12).width(Length::FillPortion(1)),
        text(&record.timestamp_label).size(12).width(Length::FillPortion(1)),
        text(record.upvotes.to_string()).size(12).width(Length::FillPortion(1)),
        text(format!("{:.0}%", record.intensity * 100.0))
            .size(12)
            .width(Length::FillPortion(1)),
        text(format!("{:.2}", record.confidence))
            .size(12)
            .width(Length::FillPortion(1)),
    ]
    .spacing(5)
    .into()
}
