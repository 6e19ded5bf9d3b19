// FormatSelector - turns raw variants into a displayable catalog
//
// Handles:
// - Partitioning into combined / video-only / audio-only buckets
// - One-line descriptions for menus and the plain format table
// - Size formatting (MB, one decimal)

use super::models::EncodingVariant;

const BYTES_PER_MB: f64 = 1_048_576.0;

/// Variants of one query, grouped by stream presence.
///
/// Buckets borrow from the query result and keep the extractor's order.
#[derive(Debug, Default)]
pub struct Catalog<'a> {
    pub combined: Vec<&'a EncodingVariant>,
    pub video_only: Vec<&'a EncodingVariant>,
    pub audio_only: Vec<&'a EncodingVariant>,
}

impl<'a> Catalog<'a> {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.combined.len() + self.video_only.len() + self.audio_only.len()
    }
}

/// How much room a description gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeStyle {
    /// "5.0 MB" / "Unknown"
    Full,
    /// "5.0MB" / "?"
    Compact,
}

pub struct FormatSelector;

impl FormatSelector {
    /// Partition variants into the three catalog buckets
    pub fn build_catalog(variants: &[EncodingVariant]) -> Catalog<'_> {
        let mut catalog = Catalog::default();

        for v in variants {
            match (v.has_video, v.has_audio) {
                (true, true) => catalog.combined.push(v),
                (true, false) => catalog.video_only.push(v),
                (false, true) => catalog.audio_only.push(v),
                (false, false) => {
                    log::debug!("[Catalog] Omitting format {} (no audio, no video)", v.id);
                }
            }
        }

        catalog
    }

    /// Format file size for display: `round(bytes / 1048576, 1)`
    pub fn format_size(bytes: Option<u64>, style: SizeStyle) -> String {
        match (bytes, style) {
            (Some(b), SizeStyle::Full) => format!("{:.1} MB", b as f64 / BYTES_PER_MB),
            (Some(b), SizeStyle::Compact) => format!("{:.1}MB", b as f64 / BYTES_PER_MB),
            (None, SizeStyle::Full) => "Unknown".to_string(),
            (None, SizeStyle::Compact) => "?".to_string(),
        }
    }

    /// Frame rate without a trailing ".0" for whole numbers
    pub fn format_fps(fps: f64) -> String {
        if fps.fract() == 0.0 {
            format!("{}", fps as i64)
        } else {
            format!("{}", fps)
        }
    }

    /// Compact one-liner used for menu entries:
    /// `[137] mp4 1920x1080 30fps (5.0MB) - 1080p`
    pub fn describe_variant(v: &EncodingVariant) -> String {
        let mut parts = vec![
            format!("[{}]", v.id),
            v.container.clone(),
            v.resolution.clone(),
        ];
        if let Some(fps) = v.frame_rate {
            parts.push(format!("{}fps", Self::format_fps(fps)));
        }
        parts.push(format!(
            "({})",
            Self::format_size(v.size_bytes, SizeStyle::Compact)
        ));
        if let Some(note) = &v.note {
            parts.push(format!("- {}", note));
        }

        parts.join(" ")
    }

    /// Header for the plain format table
    pub fn table_header() -> String {
        format!(
            "{:<8} {:<12} {:<12} {:<8} {:<15} {}",
            "ID", "Extension", "Resolution", "FPS", "Size", "Note"
        )
    }

    /// One fixed-width row of the plain format table
    pub fn describe_row(v: &EncodingVariant) -> String {
        let fps = v
            .frame_rate
            .map(Self::format_fps)
            .unwrap_or_else(|| "N/A".to_string());

        format!(
            "{:<8} {:<12} {:<12} {:<8} {:<15} {}",
            v.id,
            v.container,
            v.resolution,
            fps,
            Self::format_size(v.size_bytes, SizeStyle::Full),
            v.note.as_deref().unwrap_or("")
        )
        .trim_end()
        .to_string()
    }
}
