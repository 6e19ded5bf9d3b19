use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command as TokioCommand;

use super::errors::DownloadError;
use crate::config::Settings;

/// How yt-dlp gets invoked on this machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YtDlpCommand {
    /// Native `yt-dlp` executable
    Binary(PathBuf),
    /// `<python> -m yt_dlp`, when only the Python module is installed
    PythonModule(String),
}

impl YtDlpCommand {
    pub fn program(&self) -> OsString {
        match self {
            Self::Binary(path) => path.clone().into_os_string(),
            Self::PythonModule(python) => OsString::from(python),
        }
    }

    /// Arguments placed before any yt-dlp option
    pub fn prefix_args(&self) -> Vec<String> {
        match self {
            Self::Binary(_) => Vec::new(),
            Self::PythonModule(_) => vec!["-m".to_string(), "yt_dlp".to_string()],
        }
    }

    /// Full argument list: prefix followed by `args`
    pub fn args_with(&self, args: Vec<String>) -> Vec<String> {
        let mut all = self.prefix_args();
        all.extend(args);
        all
    }
}

/// Finds yt-dlp: explicit path, then PATH, then common install locations,
/// then the Python module.
pub struct ToolLocator {
    explicit: Option<PathBuf>,
    python: String,
}

impl ToolLocator {
    pub fn new(explicit: Option<PathBuf>, python: &str) -> Self {
        Self {
            explicit,
            python: python.to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.ytdlp_path.clone(), &settings.python)
    }

    pub async fn locate(&self) -> Result<YtDlpCommand, DownloadError> {
        if let Some(path) = &self.explicit {
            // An explicit override is never second-guessed
            if path.exists() || which::which(path).is_ok() {
                return Ok(YtDlpCommand::Binary(path.clone()));
            }
            return Err(DownloadError::ToolNotFound(format!(
                "yt-dlp not found at {}",
                path.display()
            )));
        }

        if let Some(path) = Self::find_binary() {
            log::debug!("[Tools] Using yt-dlp binary at {}", path.display());
            return Ok(YtDlpCommand::Binary(path));
        }

        if self.python_has_module().await {
            log::debug!("[Tools] Using python module via {}", self.python);
            return Ok(YtDlpCommand::PythonModule(self.python.clone()));
        }

        Err(DownloadError::ToolNotFound(
            "yt-dlp is not installed (no binary in PATH, no python module). \
             See https://github.com/yt-dlp/yt-dlp#installation"
                .to_string(),
        ))
    }

    fn find_binary() -> Option<PathBuf> {
        if let Ok(path) = which::which("yt-dlp") {
            return Some(path);
        }

        let common_paths = [
            "/opt/homebrew/bin/yt-dlp", // Homebrew on Apple Silicon
            "/usr/local/bin/yt-dlp",    // Homebrew on Intel Mac
            "/usr/bin/yt-dlp",          // System installation
        ];

        common_paths
            .iter()
            .map(Path::new)
            .find(|p| p.exists())
            .map(Path::to_path_buf)
    }

    async fn python_has_module(&self) -> bool {
        match TokioCommand::new(&self.python)
            .args(["-c", "import yt_dlp"])
            .stdin(Stdio::null())
            .output()
            .await
        {
            Ok(out) => out.status.success(),
            Err(_) => false,
        }
    }
}
