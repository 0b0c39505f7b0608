use anyhow::Context;
use gui::App;
use iced::{Application, Settings};
use insight_engine::Dashboard;
use listenboard_core::{AppConfig, InsightKind, RecordStore};
use llm_interface::ChatAssistant;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "listenboard=debug,listenboard_core=debug,insight_engine=debug,llm_interface=debug,gui=info";
const BUILTIN_SEED: &str = include_str!("../data/painpoints.json");

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    tracing::info!("Starting Listenboard");

    let config = AppConfig::load(None).context("failed to load configuration")?;

    let store = match &config.dashboard.seed_path {
        Some(path) => RecordStore::from_json_file(InsightKind::PainPoints, path)
            .with_context(|| format!("failed to load seed records from {}", path.display()))?,
        None => RecordStore::from_json_str(InsightKind::PainPoints, BUILTIN_SEED)
            .context("built-in seed records are invalid")?,
    };

    let dashboard = Dashboard::from_config(Arc::new(store), &config.dashboard);
    let assistant =
        Arc::new(ChatAssistant::from_config(&config.chat).context("failed to set up chat client")?);

    let settings = Settings {
        window: iced::window::Settings {
            size: iced::Size::new(1400.0, 860.0),
            min_size: Some(iced::Size::new(900.0, 600.0)),
            ..Default::default()
        },
        ..Settings::with_flags((dashboard, assistant))
    };

    ListenboardApp::run(settings).map_err(|e| {
        tracing::error!("Application error: {}", e);
        anyhow::anyhow!("GUI error: {e}")
    })
}

struct ListenboardApp {
    app: App,
}

impl Application for ListenboardApp {
    type Message = gui::Message;
    type Theme = iced::Theme;
    type Executor = iced::executor::Default;
    type Flags = (Dashboard, Arc<ChatAssistant>);

    fn new((dashboard, assistant): Self::Flags) -> (Self, iced::Command<Self::Message>) {
        tracing::info!(
            "Initializing dashboard with {} records",
            dashboard.store().len()
        );
        (
            Self {
                app: App::new(dashboard, assistant),
            },
            iced::Command::none(),
        )
    }

    fn title(&self) -> String {
        self.app.title()
    }

    fn update(&mut self, message: Self::Message) -> iced::Command<Self::Message> {
        self.app.update(message)
    }

    fn view(&self) -> iced::Element<Self::Message> {
        self.app.view()
    }
}
