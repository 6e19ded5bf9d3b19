// Runtime settings, read from the environment
//
// There is no config file and nothing is persisted between runs.

use std::io::IsTerminal;
use std::path::PathBuf;

use crate::ui::Presentation;

/// Explicit yt-dlp executable
pub const ENV_YTDLP_PATH: &str = "YTDLP_PATH";
/// Python interpreter for the `python -m yt_dlp` fallback
pub const ENV_YTDLP_PYTHON: &str = "YTDLP_PYTHON";
/// `menu` or `plain`
pub const ENV_UI: &str = "DWN_UI";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub ytdlp_path: Option<PathBuf>,
    pub python: String,
    pub presentation: Presentation,
}

impl Settings {
    pub fn from_env() -> Self {
        let interactive = std::io::stdin().is_terminal() && std::io::stdout().is_terminal();
        Self::from_lookup(|key| std::env::var(key).ok(), interactive)
    }

    /// Build settings from any variable lookup; `interactive` picks the default presentation
    pub fn from_lookup<F>(lookup: F, interactive: bool) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let presentation = match non_empty(ENV_UI).map(|v| v.to_lowercase()).as_deref() {
            Some("plain") | Some("text") => Presentation::Plain,
            Some("menu") => Presentation::Menu,
            Some(other) => {
                log::warn!("[Config] Unknown {}={:?}, using the default", ENV_UI, other);
                Self::default_presentation(interactive)
            }
            None => Self::default_presentation(interactive),
        };

        Self {
            ytdlp_path: non_empty(ENV_YTDLP_PATH).map(PathBuf::from),
            python: non_empty(ENV_YTDLP_PYTHON).unwrap_or_else(|| "python3".to_string()),
            presentation,
        }
    }

    fn default_presentation(interactive: bool) -> Presentation {
        if interactive {
            Presentation::Menu
        } else {
            Presentation::Plain
        }
    }
}
