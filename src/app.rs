// Download pipeline
//
// URL -> query -> catalog -> select -> resolve directory -> download.
// Every failure ends the run; it is reported once here and never retried.

use std::path::PathBuf;

use crate::downloader::directory::DirectoryResolver;
use crate::downloader::format_selector::FormatSelector;
use crate::downloader::selection::{select_variant, SelectionMode};
use crate::downloader::{DownloadError, DownloadRequest, MediaBackend, MediaInfo, ProgressSink};
use crate::ui::{Console, Presentation, Prompter, TerminalProgress};

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// File written under this directory
    Downloaded(PathBuf),
    Cancelled(String),
    Failed(String),
}

impl From<Presentation> for SelectionMode {
    fn from(presentation: Presentation) -> Self {
        match presentation {
            Presentation::Menu => SelectionMode::Menu,
            Presentation::Plain => SelectionMode::FreeText,
        }
    }
}

pub struct App<'a> {
    backend: &'a dyn MediaBackend,
    resolver: DirectoryResolver,
    mode: SelectionMode,
}

impl<'a> App<'a> {
    pub fn new(backend: &'a dyn MediaBackend, resolver: DirectoryResolver, mode: SelectionMode) -> Self {
        Self {
            backend,
            resolver,
            mode,
        }
    }

    /// Run the whole pipeline once and report how it ended
    pub async fn run(
        &self,
        url: Option<String>,
        prompter: &mut dyn Prompter,
        console: &mut Console,
        progress: &dyn ProgressSink,
    ) -> Outcome {
        Self::banner(console);

        match self.execute(url, prompter, console, progress).await {
            Ok(dir) => Outcome::Downloaded(dir),
            Err(e) if e.is_cancellation() => {
                console.notice(&e.to_string());
                Outcome::Cancelled(e.to_string())
            }
            Err(e) => {
                log::debug!("[App] Run failed via {}: {:?}", self.backend.name(), e);
                console.error(&format!("Error: {}", e));
                Outcome::Failed(e.to_string())
            }
        }
    }

    async fn execute(
        &self,
        url: Option<String>,
        prompter: &mut dyn Prompter,
        console: &mut Console,
        progress: &dyn ProgressSink,
    ) -> Result<PathBuf, DownloadError> {
        let url = match url {
            Some(u) => {
                console.success("Using URL from arguments");
                u
            }
            None => prompter
                .input("Enter YouTube URL")?
                .ok_or_else(DownloadError::cancelled)?,
        };
        let url = url.trim();
        if url.is_empty() {
            return Err(DownloadError::Cancelled("No URL provided!".to_string()));
        }

        let spinner = TerminalProgress::spinner("Fetching video information...");
        let queried = self.backend.query(url).await;
        spinner.finish_and_clear();
        let info = queried?;

        Self::show_info(&info, console);

        let catalog = FormatSelector::build_catalog(&info.variants);
        if catalog.is_empty() {
            return Err(DownloadError::EmptyCatalog);
        }
        log::debug!(
            "[App] Catalog: {} combined, {} video-only, {} audio-only",
            catalog.combined.len(),
            catalog.video_only.len(),
            catalog.audio_only.len()
        );

        let selection = select_variant(&catalog, self.mode, prompter, console)?;
        let format = selection
            .format_spec()
            .ok_or_else(DownloadError::cancelled)?;

        let location = self.resolver.resolve(prompter, console)?;

        console.blank();
        console.heading("Starting download...");
        console.field("Format", format);
        console.field("Output", &location.path.display().to_string());

        let request = DownloadRequest::new(url, format, &location.path);
        self.backend.download(&request, progress).await?;

        console.blank();
        console.success("Download complete!");
        Ok(location.path)
    }

    fn banner(console: &mut Console) {
        console.rule();
        console.heading("YouTube Video Downloader");
        console.line("Download videos in your preferred format and location");
        console.rule();
    }

    fn show_info(info: &MediaInfo, console: &mut Console) {
        let duration = info
            .duration_seconds
            .map(|d| format!("{}s", d))
            .unwrap_or_else(|| "N/A".to_string());

        console.blank();
        console.heading("Video Information");
        console.line(&info.title);
        console.field("Duration", &duration);
        console.field("Uploader", info.uploader.as_deref().unwrap_or("N/A"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::directory::DEFAULT_SHORTCUTS;
    use crate::downloader::traits::NoProgress;
    use crate::downloader::EncodingVariant;
    use crate::ui::testing::{Answer, ScriptedPrompter};
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    const CURRENT_DIR: usize = 2;
    const CUSTOM_PATH: usize = 3;

    /// In-memory backend that records every call
    struct FakeBackend {
        info: Option<MediaInfo>,
        query_error: Option<String>,
        transfer_error: Option<String>,
        queries: Mutex<Vec<String>>,
        downloads: Mutex<Vec<DownloadRequest>>,
    }

    impl FakeBackend {
        fn with_info(info: MediaInfo) -> Self {
            Self {
                info: Some(info),
                query_error: None,
                transfer_error: None,
                queries: Mutex::new(Vec::new()),
                downloads: Mutex::new(Vec::new()),
            }
        }

        fn failing_query(message: &str) -> Self {
            Self {
                info: None,
                query_error: Some(message.to_string()),
                ..Self::with_info(sample_info(vec![]))
            }
        }

        fn downloads(&self) -> Vec<DownloadRequest> {
            self.downloads.lock().unwrap().clone()
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MediaBackend for FakeBackend {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn query(&self, url: &str) -> Result<MediaInfo, DownloadError> {
            self.queries.lock().unwrap().push(url.to_string());
            match (&self.info, &self.query_error) {
                (_, Some(msg)) => Err(DownloadError::Query(msg.clone())),
                (Some(info), None) => Ok(info.clone()),
                (None, None) => Err(DownloadError::Parse("no info".to_string())),
            }
        }

        async fn download(
            &self,
            request: &DownloadRequest,
            _progress: &dyn ProgressSink,
        ) -> Result<(), DownloadError> {
            self.downloads.lock().unwrap().push(request.clone());
            match &self.transfer_error {
                Some(msg) => Err(DownloadError::Transfer(msg.clone())),
                None => Ok(()),
            }
        }
    }

    /// Console output captured for assertions
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
        }
    }

    fn variant(id: &str, has_video: bool, has_audio: bool) -> EncodingVariant {
        EncodingVariant {
            id: id.to_string(),
            container: "mp4".to_string(),
            resolution: "1280x720".to_string(),
            frame_rate: Some(30.0),
            size_bytes: Some(5_242_880),
            note: None,
            has_video,
            has_audio,
        }
    }

    fn sample_info(variants: Vec<EncodingVariant>) -> MediaInfo {
        MediaInfo {
            title: "Sample Clip".to_string(),
            duration_seconds: Some(212),
            uploader: Some("Someone".to_string()),
            variants,
        }
    }

    fn default_info() -> MediaInfo {
        sample_info(vec![
            variant("18", true, true),
            variant("137", true, false),
            variant("140", false, true),
        ])
    }

    struct Harness {
        home: TempDir,
        cwd: TempDir,
        console: Console,
        captured: Captured,
    }

    fn harness() -> Harness {
        let captured = Captured::default();
        Harness {
            home: TempDir::new().unwrap(),
            cwd: TempDir::new().unwrap(),
            console: Console::new(Box::new(captured.clone())),
            captured,
        }
    }

    impl Harness {
        fn app<'a>(&self, backend: &'a dyn MediaBackend, mode: SelectionMode) -> App<'a> {
            let resolver = DirectoryResolver::with_dirs(
                DEFAULT_SHORTCUTS,
                Some(self.home.path().to_path_buf()),
                self.cwd.path().to_path_buf(),
            );
            App::new(backend, resolver, mode)
        }
    }

    #[tokio::test]
    async fn test_best_quality_into_current_directory() {
        let mut h = harness();
        let backend = FakeBackend::with_info(default_info());
        let app = h.app(&backend, SelectionMode::Menu);
        let mut prompter = ScriptedPrompter::new(vec![Answer::Pick(0), Answer::Pick(CURRENT_DIR)]);

        let outcome = app
            .run(
                Some("https://youtu.be/abc".to_string()),
                &mut prompter,
                &mut h.console,
                &NoProgress,
            )
            .await;

        assert_eq!(outcome, Outcome::Downloaded(h.cwd.path().to_path_buf()));
        let downloads = backend.downloads();
        assert_eq!(downloads.len(), 1);
        assert_eq!(downloads[0].url, "https://youtu.be/abc");
        assert_eq!(downloads[0].format, "best");
        assert_eq!(downloads[0].output_dir, h.cwd.path());

        let text = h.captured.text();
        assert!(text.contains("Sample Clip"));
        assert!(text.contains("212s"));
        assert!(text.contains("Download complete!"));
    }

    #[tokio::test]
    async fn test_url_prompt_and_specific_format() {
        let mut h = harness();
        let backend = FakeBackend::with_info(default_info());
        let app = h.app(&backend, SelectionMode::FreeText);
        let target = h.cwd.path().join("videos");
        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Text("  https://youtu.be/xyz ".to_string()),
            Answer::Text("137".to_string()),
            Answer::Pick(CUSTOM_PATH),
            Answer::Text(target.to_string_lossy().to_string()),
            Answer::Confirm(true),
        ]);

        let outcome = app.run(None, &mut prompter, &mut h.console, &NoProgress).await;

        assert_eq!(outcome, Outcome::Downloaded(target.clone()));
        assert_eq!(backend.queries(), vec!["https://youtu.be/xyz"]);
        let downloads = backend.downloads();
        assert_eq!(downloads[0].format, "137");
        assert_eq!(downloads[0].output_dir, target);
        assert!(prompter.exhausted());
    }

    #[tokio::test]
    async fn test_empty_url_stops_before_query() {
        let mut h = harness();
        let backend = FakeBackend::with_info(default_info());
        let app = h.app(&backend, SelectionMode::Menu);
        let mut prompter = ScriptedPrompter::new(vec![Answer::Text(String::new())]);

        let outcome = app.run(None, &mut prompter, &mut h.console, &NoProgress).await;

        assert_eq!(outcome, Outcome::Cancelled("No URL provided!".to_string()));
        assert!(backend.queries().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_at_any_prompt_never_downloads() {
        let scripts = vec![
            // URL prompt
            (None, vec![Answer::Cancel]),
            // format menu
            (Some("https://youtu.be/abc"), vec![Answer::Cancel]),
            // directory menu
            (Some("https://youtu.be/abc"), vec![Answer::Pick(0), Answer::Cancel]),
            // custom path prompt
            (
                Some("https://youtu.be/abc"),
                vec![Answer::Pick(0), Answer::Pick(CUSTOM_PATH), Answer::Cancel],
            ),
            // create-directory confirmation declined
            (
                Some("https://youtu.be/abc"),
                vec![
                    Answer::Pick(0),
                    Answer::Pick(CUSTOM_PATH),
                    Answer::Text("~/not-yet".to_string()),
                    Answer::Confirm(false),
                ],
            ),
        ];

        for (url, answers) in scripts {
            let mut h = harness();
            let backend = FakeBackend::with_info(default_info());
            let app = h.app(&backend, SelectionMode::Menu);
            let mut prompter = ScriptedPrompter::new(answers);

            let outcome = app
                .run(url.map(String::from), &mut prompter, &mut h.console, &NoProgress)
                .await;

            assert!(matches!(outcome, Outcome::Cancelled(_)), "{:?}", outcome);
            assert!(backend.downloads().is_empty());
            assert!(prompter.exhausted());
        }
    }

    #[tokio::test]
    async fn test_free_text_quit() {
        let mut h = harness();
        let backend = FakeBackend::with_info(default_info());
        let app = h.app(&backend, SelectionMode::FreeText);
        let mut prompter = ScriptedPrompter::new(vec![Answer::Text("q".to_string())]);

        let outcome = app
            .run(
                Some("https://youtu.be/abc".to_string()),
                &mut prompter,
                &mut h.console,
                &NoProgress,
            )
            .await;

        assert_eq!(outcome, Outcome::Cancelled("Cancelled.".to_string()));
        assert!(backend.downloads().is_empty());
        assert!(h.captured.text().contains("Available formats:"));
    }

    #[tokio::test]
    async fn test_empty_catalog_aborts_without_prompting() {
        let mut h = harness();
        let backend = FakeBackend::with_info(sample_info(vec![variant("sb0", false, false)]));
        let app = h.app(&backend, SelectionMode::Menu);
        let mut prompter = ScriptedPrompter::new(vec![]);

        let outcome = app
            .run(
                Some("https://youtu.be/abc".to_string()),
                &mut prompter,
                &mut h.console,
                &NoProgress,
            )
            .await;

        assert_eq!(
            outcome,
            Outcome::Failed("No formats available for this URL".to_string())
        );
        assert!(prompter.asked.is_empty());
        assert!(backend.downloads().is_empty());
    }

    #[tokio::test]
    async fn test_query_failure_is_reported() {
        let mut h = harness();
        let backend = FakeBackend::failing_query("Unsupported URL: https://example.com");
        let app = h.app(&backend, SelectionMode::Menu);
        let mut prompter = ScriptedPrompter::new(vec![]);

        let outcome = app
            .run(
                Some("https://example.com".to_string()),
                &mut prompter,
                &mut h.console,
                &NoProgress,
            )
            .await;

        assert!(matches!(&outcome, Outcome::Failed(m) if m.contains("Unsupported URL")));
        assert!(h.captured.text().contains("Error: Unsupported URL"));
        assert!(backend.downloads().is_empty());
    }

    #[tokio::test]
    async fn test_transfer_failure_is_reported() {
        let mut h = harness();
        let backend = FakeBackend {
            transfer_error: Some("HTTP Error 403: Forbidden".to_string()),
            ..FakeBackend::with_info(default_info())
        };
        let app = h.app(&backend, SelectionMode::Menu);
        let mut prompter = ScriptedPrompter::new(vec![Answer::Pick(2), Answer::Pick(CURRENT_DIR)]);

        let outcome = app
            .run(
                Some("https://youtu.be/abc".to_string()),
                &mut prompter,
                &mut h.console,
                &NoProgress,
            )
            .await;

        assert_eq!(
            outcome,
            Outcome::Failed("Error downloading: HTTP Error 403: Forbidden".to_string())
        );
        assert_eq!(backend.downloads()[0].format, "bestaudio");
    }

    #[test]
    fn test_presentation_picks_selection_mode() {
        assert_eq!(SelectionMode::from(Presentation::Menu), SelectionMode::Menu);
        assert_eq!(SelectionMode::from(Presentation::Plain), SelectionMode::FreeText);
    }
}
