// Directory resolver - where the download lands
//
// Offers a fixed list of shortcuts plus a custom path, expands `~`,
// and creates the directory after confirmation.

use std::path::{Path, PathBuf};

use super::errors::DownloadError;
use crate::ui::{Console, Prompter};

/// What a shortcut points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutTarget {
    /// Path template; may start with `~`
    Path(&'static str),
    CurrentDir,
    Custom,
}

/// A predefined output-directory option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub label: &'static str,
    pub target: ShortcutTarget,
}

pub const DEFAULT_SHORTCUTS: &[Shortcut] = &[
    Shortcut {
        label: "🎵 Music",
        target: ShortcutTarget::Path("~/Music"),
    },
    Shortcut {
        label: "📥 Downloads",
        target: ShortcutTarget::Path("~/Downloads"),
    },
    Shortcut {
        label: "📁 Current directory",
        target: ShortcutTarget::CurrentDir,
    },
    Shortcut {
        label: "✏️  Custom path...",
        target: ShortcutTarget::Custom,
    },
];

/// A resolved, absolute output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    pub path: PathBuf,
    /// Whether the directory existed when it was resolved
    pub existed: bool,
}

pub struct DirectoryResolver {
    shortcuts: Vec<Shortcut>,
    home: Option<PathBuf>,
    cwd: PathBuf,
}

impl DirectoryResolver {
    /// Resolver for the invoking user: home from `dirs`, cwd from the process
    pub fn new(shortcuts: &[Shortcut]) -> Result<Self, DownloadError> {
        let cwd = std::env::current_dir()
            .map_err(|e| DownloadError::Directory(format!("current directory: {}", e)))?;
        Ok(Self::with_dirs(shortcuts, dirs::home_dir(), cwd))
    }

    pub fn with_dirs(shortcuts: &[Shortcut], home: Option<PathBuf>, cwd: PathBuf) -> Self {
        Self {
            shortcuts: shortcuts.to_vec(),
            home,
            cwd,
        }
    }

    /// Expand a leading `~` and make the path absolute
    pub fn expand(&self, raw: &str) -> Result<PathBuf, DownloadError> {
        let expanded = match (raw, &self.home) {
            ("~", Some(home)) => home.clone(),
            (r, Some(home)) if r.starts_with("~/") => home.join(&r[2..]),
            (r, None) if r == "~" || r.starts_with("~/") => {
                return Err(DownloadError::Directory(format!(
                    "cannot expand {}: home directory is unknown",
                    r
                )));
            }
            (r, _) => PathBuf::from(r),
        };

        Ok(if expanded.is_absolute() {
            expanded
        } else if expanded == Path::new(".") {
            self.cwd.clone()
        } else {
            self.cwd.join(expanded)
        })
    }

    /// Menu lines, with an existence mark on fixed paths
    pub fn menu_labels(&self) -> Vec<String> {
        self.shortcuts
            .iter()
            .map(|s| match s.target {
                ShortcutTarget::Path(template) => {
                    let exists = self.expand(template).map_or(false, |p| p.exists());
                    let mark = if exists { "✓" } else { "✗" };
                    format!("{} {} [{}]", mark, s.label, template)
                }
                ShortcutTarget::CurrentDir | ShortcutTarget::Custom => s.label.to_string(),
            })
            .collect()
    }

    /// Ask for a directory and make sure it exists
    pub fn resolve(
        &self,
        prompter: &mut dyn Prompter,
        console: &mut Console,
    ) -> Result<OutputLocation, DownloadError> {
        console.blank();
        console.heading("Choose output directory:");

        let labels = self.menu_labels();
        let picked = prompter
            .select("Use arrow keys to navigate, Enter to select", &labels, 0)?
            .ok_or_else(DownloadError::cancelled)?;

        let shortcut = self
            .shortcuts
            .get(picked)
            .ok_or_else(|| DownloadError::Directory(format!("no shortcut at index {}", picked)))?;

        let path = match shortcut.target {
            ShortcutTarget::Path(template) => self.expand(template)?,
            ShortcutTarget::CurrentDir => self.cwd.clone(),
            ShortcutTarget::Custom => {
                let typed = prompter
                    .input("Enter custom directory path")?
                    .ok_or_else(DownloadError::cancelled)?;
                if typed.is_empty() {
                    return Err(DownloadError::Cancelled("No path provided!".to_string()));
                }
                self.expand(&typed)?
            }
        };

        self.ensure_exists(path, prompter, console)
    }

    /// Offer to create a missing directory (default: yes)
    pub fn ensure_exists(
        &self,
        path: PathBuf,
        prompter: &mut dyn Prompter,
        console: &mut Console,
    ) -> Result<OutputLocation, DownloadError> {
        if path.exists() {
            if !path.is_dir() {
                return Err(DownloadError::Directory(format!(
                    "{} is not a directory",
                    path.display()
                )));
            }
            return Ok(OutputLocation { path, existed: true });
        }

        let create = prompter
            .confirm("Directory doesn't exist. Create it?", true)?
            .ok_or_else(DownloadError::cancelled)?;
        if !create {
            return Err(DownloadError::Cancelled("Download cancelled.".to_string()));
        }

        std::fs::create_dir_all(&path).map_err(|e| DownloadError::Directory(e.to_string()))?;
        log::debug!("[Directory] Created {}", path.display());
        console.success(&format!("Created directory: {}", path.display()));

        Ok(OutputLocation {
            path,
            existed: false,
        })
    }
}
