// Common data models for the downloader

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use super::errors::DownloadError;

/// Codec value yt-dlp uses for "stream absent"
const NO_CODEC: &str = "none";

/// One encoding variant offered by the extractor
#[derive(Debug, Clone, PartialEq)]
pub struct EncodingVariant {
    /// Format ID (e.g., "137", "140", "hls-720p")
    pub id: String,
    /// Container / file extension (mp4, webm, m4a)
    pub container: String,
    /// Resolution string (e.g., "1920x1080" or "audio only")
    pub resolution: String,
    /// Frames per second
    pub frame_rate: Option<f64>,
    /// Exact size when known, otherwise the approximate one
    pub size_bytes: Option<u64>,
    /// Format note (e.g., "1080p", "medium")
    pub note: Option<String>,
    pub has_video: bool,
    pub has_audio: bool,
}

impl EncodingVariant {
    /// Neither audio nor video: storyboards and other junk rows
    pub fn is_malformed(&self) -> bool {
        !self.has_video && !self.has_audio
    }
}

/// Media item as reported by the extractor
#[derive(Debug, Clone)]
pub struct MediaInfo {
    pub title: String,
    pub duration_seconds: Option<u64>,
    pub uploader: Option<String>,
    pub variants: Vec<EncodingVariant>,
}

/// Raw `--dump-json` document; every field we don't name is ignored
#[derive(Debug, Deserialize)]
pub struct RawMediaInfo {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub duration: Option<u64>,
    pub uploader: Option<String>,
    #[serde(default)]
    pub formats: Vec<RawFormat>,
}

/// Raw format record from yt-dlp
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFormat {
    pub format_id: Option<String>,
    pub ext: Option<String>,
    pub resolution: Option<String>,
    pub fps: Option<f64>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub filesize: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub filesize_approx: Option<u64>,
    pub format_note: Option<String>,
}

impl TryFrom<RawFormat> for EncodingVariant {
    type Error = DownloadError;

    fn try_from(raw: RawFormat) -> Result<Self, Self::Error> {
        let id = raw
            .format_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DownloadError::Parse("format without format_id".to_string()))?;

        // A missing codec field is not evidence of a missing stream
        let has_video = raw.vcodec.as_deref() != Some(NO_CODEC);
        let has_audio = raw.acodec.as_deref() != Some(NO_CODEC);

        let resolution = raw.resolution.unwrap_or_else(|| {
            if has_video {
                "N/A".to_string()
            } else {
                "audio only".to_string()
            }
        });

        // Zero means "unknown" for both size fields
        let size_bytes = raw
            .filesize
            .filter(|s| *s > 0)
            .or(raw.filesize_approx.filter(|s| *s > 0));

        Ok(Self {
            id,
            container: raw.ext.unwrap_or_else(|| "N/A".to_string()),
            resolution,
            frame_rate: raw.fps.filter(|f| *f > 0.0),
            size_bytes,
            note: raw.format_note.filter(|n| !n.is_empty()),
            has_video,
            has_audio,
        })
    }
}

impl From<RawMediaInfo> for MediaInfo {
    fn from(raw: RawMediaInfo) -> Self {
        let mut variants = Vec::with_capacity(raw.formats.len());
        for format in raw.formats {
            match EncodingVariant::try_from(format) {
                Ok(v) => variants.push(v),
                Err(e) => log::warn!("[Models] Skipping format record: {}", e),
            }
        }

        Self {
            title: raw.title.unwrap_or_else(|| "Unknown".to_string()),
            duration_seconds: raw.duration,
            uploader: raw.uploader,
            variants,
        }
    }
}

impl MediaInfo {
    /// Parse the JSON printed by `yt-dlp --dump-json`
    pub fn from_json(stdout: &[u8]) -> Result<Self, DownloadError> {
        let raw: RawMediaInfo = serde_json::from_slice(stdout)
            .map_err(|e| DownloadError::Parse(format!("Invalid JSON: {}", e)))?;
        Ok(raw.into())
    }
}

/// yt-dlp emits integers for sizes and durations, but floats show up too
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(value.and_then(|n| {
        n.as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
    }))
}

/// Output filename template, resolved by yt-dlp itself
pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Everything the download backend needs for one transfer
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRequest {
    pub url: String,
    /// Variant identifier or engine selector ("best", "bestaudio", ...)
    pub format: String,
    pub output_dir: PathBuf,
}

impl DownloadRequest {
    pub fn new(url: &str, format: &str, output_dir: &Path) -> Self {
        Self {
            url: url.to_string(),
            format: format.to_string(),
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// `<output_dir>/%(title)s.%(ext)s`
    pub fn output_template(&self) -> String {
        self.output_dir
            .join(OUTPUT_TEMPLATE)
            .to_string_lossy()
            .to_string()
    }
}

/// What yt-dlp is currently doing
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Destination(String),
    Downloading,
    Merging,
    AlreadyDownloaded,
}

/// Download progress information
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadProgress {
    pub stage: Stage,
    pub percent: f32,
    pub speed: Option<String>,
    pub eta: Option<String>,
}
