// Error types for the download pipeline

use thiserror::Error;

use super::diagnostics::diagnose_error;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// Extraction query failed (bad URL, network fault, unsupported source)
    #[error("{0}")]
    Query(String),

    /// yt-dlp (binary or python module) not found on this system
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// yt-dlp output was not the JSON we expected
    #[error("Parse error: {0}")]
    Parse(String),

    /// Query succeeded but returned zero variants
    #[error("No formats available for this URL")]
    EmptyCatalog,

    /// User cancelled or interrupted a prompt
    #[error("{0}")]
    Cancelled(String),

    /// Output directory cannot be created or used
    #[error("Error creating directory: {0}")]
    Directory(String),

    /// Download failed inside yt-dlp
    #[error("Error downloading: {0}")]
    Transfer(String),

    /// Terminal I/O failure outside of a prompt
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    pub fn cancelled() -> Self {
        Self::Cancelled("Cancelled.".to_string())
    }

    /// Cancellation is reported, but it is not a failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    /// Build a query error from yt-dlp stderr, prefixed by a diagnosis when one is known.
    pub fn query_from_stderr(stderr: &str) -> Self {
        Self::Query(with_diagnosis(stderr))
    }

    /// Build a transfer error from yt-dlp stderr, prefixed by a diagnosis when one is known.
    pub fn transfer_from_stderr(stderr: &str) -> Self {
        Self::Transfer(with_diagnosis(stderr))
    }
}

fn with_diagnosis(stderr: &str) -> String {
    // Keep the lines yt-dlp marks as errors; fall back to the last non-empty line
    let important: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("ERROR:"))
        .collect();

    let details = if important.is_empty() {
        stderr
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("unknown error")
            .to_string()
    } else {
        important.join(" | ")
    };

    match diagnose_error(stderr) {
        Some(reason) => format!("{}: {}", reason.description(), details),
        None => details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_keeps_error_lines() {
        let stderr = "WARNING: something minor\nERROR: [generic] 'foo' is not a valid URL\n";
        let err = DownloadError::query_from_stderr(stderr);
        assert_eq!(
            err.to_string(),
            "Unsupported or invalid URL: ERROR: [generic] 'foo' is not a valid URL"
        );
    }

    #[test]
    fn test_transfer_error_falls_back_to_last_line() {
        let err = DownloadError::transfer_from_stderr("first\n\nsomething broke\n\n");
        assert_eq!(err.to_string(), "Error downloading: something broke");
    }

    #[test]
    fn test_cancellation_is_not_failure() {
        assert!(DownloadError::cancelled().is_cancellation());
        assert!(!DownloadError::EmptyCatalog.is_cancellation());
    }
}
