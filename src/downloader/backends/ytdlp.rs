// yt-dlp backend - drives the yt-dlp command line
//
// Works with a native binary or with `python -m yt_dlp`; the locator decides
// which one, once per call. Query uses `--dump-json`, download streams
// `--newline` progress from stdout and keeps stderr for error reporting.

use async_trait::async_trait;

use crate::downloader::errors::DownloadError;
use crate::downloader::models::{DownloadRequest, MediaInfo};
use crate::downloader::tools::ToolLocator;
use crate::downloader::traits::{MediaBackend, ProgressSink};
use crate::downloader::utils::{parse_progress_line, run_output, run_streaming};

pub struct YtDlpBackend {
    locator: ToolLocator,
}

impl YtDlpBackend {
    pub fn new(locator: ToolLocator) -> Self {
        Self { locator }
    }

    /// Arguments for fetching media information as one JSON document
    pub fn query_args(url: &str) -> Vec<String> {
        vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            url.to_string(),
        ]
    }

    /// Arguments for downloading one format into the requested directory
    pub fn download_args(request: &DownloadRequest) -> Vec<String> {
        vec![
            "-f".to_string(),
            request.format.clone(),
            "--no-playlist".to_string(),
            "--newline".to_string(),
            "-o".to_string(),
            request.output_template(),
            request.url.clone(),
        ]
    }
}

#[async_trait]
impl MediaBackend for YtDlpBackend {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn query(&self, url: &str) -> Result<MediaInfo, DownloadError> {
        // A missing tool surfaces as a query failure
        let command = self
            .locator
            .locate()
            .await
            .map_err(|e| DownloadError::Query(e.to_string()))?;
        let args = command.args_with(Self::query_args(url));
        log::info!("[YtDlp] Fetching info: {}", url);

        let output = run_output(command.program(), &args)
            .await
            .map_err(DownloadError::Query)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::warn!("[YtDlp] Query failed ({}): {}", output.status, stderr.trim());
            return Err(DownloadError::query_from_stderr(&stderr));
        }

        let info = MediaInfo::from_json(&output.stdout)?;
        log::info!(
            "[YtDlp] Got info: {} ({} formats)",
            info.title,
            info.variants.len()
        );
        Ok(info)
    }

    async fn download(
        &self,
        request: &DownloadRequest,
        progress: &dyn ProgressSink,
    ) -> Result<(), DownloadError> {
        let command = self.locator.locate().await?;
        let args = command.args_with(Self::download_args(request));
        log::info!(
            "[YtDlp] Downloading format {} to {}",
            request.format,
            request.output_dir.display()
        );

        let result = run_streaming(command.program(), &args, |line| {
            match parse_progress_line(line) {
                Some(update) => progress.on_progress(&update),
                None => log::debug!("[YtDlp] {}", line),
            }
        })
        .await;
        progress.finish();

        let (status, stderr) = result.map_err(DownloadError::Transfer)?;
        if !status.success() {
            log::warn!("[YtDlp] Download failed ({}): {}", status, stderr.trim());
            return Err(DownloadError::transfer_from_stderr(&stderr));
        }

        log::info!("[YtDlp] Download finished");
        Ok(())
    }
}
