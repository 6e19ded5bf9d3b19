pub mod app;
pub mod config;
pub mod downloader;
pub mod ui;

use app::App;
use config::Settings;
use downloader::backends::YtDlpBackend;
use downloader::directory::{DirectoryResolver, DEFAULT_SHORTCUTS};
use downloader::tools::ToolLocator;
use downloader::MediaBackend;
use ui::{Console, TerminalProgress};

/// Interactive entry point: one URL, one download
pub async fn run(url: Option<String>) -> anyhow::Result<()> {
    let settings = Settings::from_env();
    log::debug!("[Config] {:?}", settings);

    let backend = YtDlpBackend::new(ToolLocator::from_settings(&settings));
    log::debug!("[App] Using backend {}", backend.name());

    let resolver = DirectoryResolver::new(DEFAULT_SHORTCUTS)?;
    let app = App::new(&backend, resolver, settings.presentation.into());

    let mut prompter = settings.presentation.prompter();
    let mut console = Console::stdout();
    let progress = TerminalProgress::new();

    let outcome = app
        .run(url, prompter.as_mut(), &mut console, &progress)
        .await;
    log::debug!("[App] Finished: {:?}", outcome);

    Ok(())
}
