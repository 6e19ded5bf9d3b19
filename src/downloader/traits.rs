// Media backend trait definition

use async_trait::async_trait;

use super::errors::DownloadError;
use super::models::{DownloadProgress, DownloadRequest, MediaInfo};

/// The external extraction/download engine, seen from the pipeline
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Name of the backend (for logging)
    fn name(&self) -> &'static str;

    /// Fetch media information and the list of encoding variants
    async fn query(&self, url: &str) -> Result<MediaInfo, DownloadError>;

    /// Download one variant; progress is reported through `progress`
    async fn download(
        &self,
        request: &DownloadRequest,
        progress: &dyn ProgressSink,
    ) -> Result<(), DownloadError>;
}

/// Observer for download progress. Must not block.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, progress: &DownloadProgress);

    /// Called once the transfer ends, successfully or not
    fn finish(&self) {}
}

/// Drops every event
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _progress: &DownloadProgress) {}
}
