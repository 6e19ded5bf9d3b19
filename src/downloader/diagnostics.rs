// Failure diagnostics - classifies yt-dlp error output
//
// yt-dlp reports every failure as free text on stderr. We look for the
// well-known patterns so the user sees a short reason first and the raw
// details after it.

use regex::Regex;

/// Known reasons a query or download is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// URL is malformed or no extractor handles it
    UnsupportedUrl,

    /// HTTP 403 Forbidden - general access denied
    Http403Forbidden,

    /// Age-restricted content requiring login
    AgeRestricted,

    /// Geographic restriction
    GeoBlocked,

    /// Network timeout or unreachable host
    NetworkTimeout,

    /// Rate limiting (429 or similar)
    RateLimited,

    /// Bot detection triggered
    BotDetection,

    /// Private video requiring authorization
    PrivateVideo,

    /// Video deleted or unavailable
    VideoUnavailable,

    /// DRM-protected or paid content, cannot be downloaded at all
    DrmProtected,

    /// Member-only content (requires channel membership)
    MembersOnly,
}

impl FailureReason {
    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::UnsupportedUrl => "Unsupported or invalid URL",
            Self::Http403Forbidden => "Access denied (HTTP 403)",
            Self::AgeRestricted => "Age-restricted content",
            Self::GeoBlocked => "Geographic restriction",
            Self::NetworkTimeout => "Network timeout",
            Self::RateLimited => "Rate limited by the site",
            Self::BotDetection => "Bot detection triggered",
            Self::PrivateVideo => "Private video",
            Self::VideoUnavailable => "Video unavailable",
            Self::DrmProtected => "DRM-protected content",
            Self::MembersOnly => "Members-only content",
        }
    }
}

lazy_static::lazy_static! {
    static ref URL_RE: Regex = Regex::new(r"https?://\S+").unwrap();
    static ref DRM_RE: Regex = Regex::new(r"\bdrm\b").unwrap();
    static ref HTTP_403_RE: Regex = Regex::new(r"\b403\b").unwrap();
    static ref HTTP_429_RE: Regex = Regex::new(r"\b429\b").unwrap();
}

/// The part of yt-dlp's output worth classifying: its `ERROR:` lines when
/// there are any, lowercased, with URLs removed
fn diagnosable_text(error: &str) -> String {
    let error_lines: Vec<&str> = error
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("ERROR:"))
        .collect();
    let text = if error_lines.is_empty() {
        error.to_string()
    } else {
        error_lines.join("\n")
    };

    URL_RE.replace_all(&text, "").to_lowercase()
}

/// Analyze an error message and return the failure reason, if recognised
pub fn diagnose_error(error: &str) -> Option<FailureReason> {
    let lower = diagnosable_text(error);

    // Most specific patterns first

    if DRM_RE.is_match(&lower)
        || lower.contains("widevine")
        || lower.contains("playready")
        || lower.contains("fairplay")
        || lower.contains("requires purchase")
        || lower.contains("this video requires payment")
    {
        return Some(FailureReason::DrmProtected);
    }

    if lower.contains("members only")
        || lower.contains("members-only")
        || lower.contains("join this channel")
        || lower.contains("available to members")
    {
        return Some(FailureReason::MembersOnly);
    }

    if lower.contains("unsupported url")
        || lower.contains("is not a valid url")
        || lower.contains("invalid url")
    {
        return Some(FailureReason::UnsupportedUrl);
    }

    if lower.contains("age-restricted")
        || lower.contains("sign in to confirm your age")
        || lower.contains("age_verification")
    {
        return Some(FailureReason::AgeRestricted);
    }

    if lower.contains("private video")
        || lower.contains("video is private")
        || lower.contains("sign in if you've been granted access")
    {
        return Some(FailureReason::PrivateVideo);
    }

    if lower.contains("video unavailable")
        || lower.contains("video has been removed")
        || lower.contains("this video is no longer available")
        || lower.contains("video is unavailable")
    {
        return Some(FailureReason::VideoUnavailable);
    }

    if lower.contains("not available in your country")
        || lower.contains("blocked in your country")
        || lower.contains("geo restricted")
        || lower.contains("geo-restricted")
    {
        return Some(FailureReason::GeoBlocked);
    }

    if HTTP_429_RE.is_match(&lower) || lower.contains("rate limit") || lower.contains("too many requests") {
        return Some(FailureReason::RateLimited);
    }

    if lower.contains("not a bot") || lower.contains("captcha") || lower.contains("unusual traffic") {
        return Some(FailureReason::BotDetection);
    }

    if HTTP_403_RE.is_match(&lower) || lower.contains("forbidden") {
        return Some(FailureReason::Http403Forbidden);
    }

    if lower.contains("timeout")
        || lower.contains("timed out")
        || lower.contains("connection refused")
        || lower.contains("network is unreachable")
        || lower.contains("name or service not known")
    {
        return Some(FailureReason::NetworkTimeout);
    }

    None
}
