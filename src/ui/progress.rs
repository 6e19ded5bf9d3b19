use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::downloader::models::{DownloadProgress, Stage};
use crate::downloader::traits::ProgressSink;

// yt-dlp reports tenths of a percent
const BAR_LENGTH: u64 = 1000;

/// Progress bar for a running download
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(BAR_LENGTH);
        if let Ok(style) =
            ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        Self { bar }
    }

    /// Spinner shown while yt-dlp fetches the media information
    pub fn spinner(message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TerminalProgress {
    fn on_progress(&self, progress: &DownloadProgress) {
        match &progress.stage {
            Stage::Destination(file) => {
                // A merged download fetches video and audio one after the other
                self.bar.set_position(0);
                self.bar.println(format!("Destination: {}", file));
            }
            Stage::Downloading => {
                self.bar
                    .set_position((progress.percent * 10.0).round().min(BAR_LENGTH as f32) as u64);
                self.bar.set_message(format!(
                    "{:.1}% | Speed: {} | ETA: {}",
                    progress.percent,
                    progress.speed.as_deref().unwrap_or("N/A"),
                    progress.eta.as_deref().unwrap_or("N/A"),
                ));
            }
            Stage::Merging => {
                self.bar.set_position(BAR_LENGTH);
                self.bar.set_message("Processing...");
            }
            Stage::AlreadyDownloaded => {
                self.bar.set_position(BAR_LENGTH);
                self.bar.set_message("File already downloaded");
            }
        }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
