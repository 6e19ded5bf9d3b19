// Presentation layer
//
// Everything the pipeline shows or asks goes through a `Prompter` (questions)
// or a `Console` (plain output). Two prompters exist: arrow-key menus for a
// real terminal and a line-oriented one for pipes and dumb terminals.

mod console;
mod menu;
mod plain;
mod progress;

pub use console::Console;
pub use menu::MenuPrompter;
pub use plain::LinePrompter;
pub use progress::TerminalProgress;

use crate::downloader::DownloadError;

/// Interactive questions. `Ok(None)` means the user cancelled
/// (Esc, Ctrl-C inside the prompt, or end of input).
pub trait Prompter {
    /// Read one line of free text
    fn input(&mut self, prompt: &str) -> Result<Option<String>, DownloadError>;

    /// Pick one of `items`; returns its index
    fn select(
        &mut self,
        prompt: &str,
        items: &[String],
        default: usize,
    ) -> Result<Option<usize>, DownloadError>;

    /// Yes/no question
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<Option<bool>, DownloadError>;
}

/// Which prompter drives the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Arrow-key select menus
    Menu,
    /// Numbered lists and typed answers
    Plain,
}

impl Presentation {
    pub fn prompter(self) -> Box<dyn Prompter> {
        match self {
            Self::Menu => Box::new(MenuPrompter::new()),
            Self::Plain => Box::new(LinePrompter::stdio()),
        }
    }
}
