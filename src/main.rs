use codefeed_core::{AppConfig, CoreError};
use database::Database;
use feed::SyntheticPageSource;
use gui::{App, AppContext};
use iced::{Application, Settings};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    tracing_subscriber::fmt()
        .with_env_filter("codefeed=debug,gui=debug,feed=debug,verifier=debug,database=debug")
        .init();

    tracing::info!("Starting Codefeed");

    let config = AppConfig::load()?;
    let session = config.session.to_context();

    let mut database = Database::new(config.database.url.clone());
    database.connect().await?;
    database.run_migrations().await?;

    let verifier = verifier::verifier_from_config(&config.verifier)?;
    let source = Arc::new(SyntheticPageSource::from_config(&config.feed));

    let context = AppContext {
        config,
        session,
        database,
        verifier,
        source,
    };

    let settings = Settings {
        window: iced::window::Settings {
            size: iced::Size::new(1200.0, 800.0),
            min_size: Some(iced::Size::new(800.0, 600.0)),
            ..Default::default()
        },
        ..Settings::with_flags(context)
    };

    CodefeedApp::run(settings).map_err(|e| {
        tracing::error!("Application error: {}", e);
        CoreError::Internal {
            message: format!("GUI error: {e}"),
        }
    })
}

struct CodefeedApp {
    app: App,
}

impl Application for CodefeedApp {
    type Message = gui::Message;
    type Theme = iced::Theme;
    type Executor = iced::executor::Default;
    type Flags = AppContext;

    fn new(flags: Self::Flags) -> (Self, iced::Command<Self::Message>) {
        tracing::info!("Initializing application");
        let (app, command) = App::new(flags);
        (Self { app }, command)
    }

    fn title(&self) -> String {
        format!("Codefeed · {} points", self.app.points())
    }

    fn update(&mut self, message: Self::Message) -> iced::Command<Self::Message> {
        self.app.update(message)
    }

    fn view(&self) -> iced::Element<Self::Message> {
        self.app.view()
    }

    fn subscription(&self) -> iced::Subscription<Self::Message> {
        self.app.subscription()
    }
}
