use std::io;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use super::Prompter;
use crate::downloader::DownloadError;

/// Arrow-key menus on a real terminal
pub struct MenuPrompter {
    theme: ColorfulTheme,
}

impl MenuPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for MenuPrompter {
    fn default() -> Self {
        Self::new()
    }
}

/// Ctrl-C inside a prompt arrives as an interrupted read: that is a cancel, not a fault
fn cancel_on_interrupt<T>(err: dialoguer::Error) -> Result<Option<T>, DownloadError> {
    match err {
        dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::Interrupted => {
            log::debug!("[Menu] Prompt interrupted");
            Ok(None)
        }
        dialoguer::Error::IO(e) => Err(DownloadError::Io(e)),
    }
}

impl Prompter for MenuPrompter {
    fn input(&mut self, prompt: &str) -> Result<Option<String>, DownloadError> {
        match Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
        {
            Ok(text) => Ok(Some(text.trim().to_string())),
            Err(e) => cancel_on_interrupt(e),
        }
    }

    fn select(
        &mut self,
        prompt: &str,
        items: &[String],
        default: usize,
    ) -> Result<Option<usize>, DownloadError> {
        Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact_opt()
            .or_else(cancel_on_interrupt)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<Option<bool>, DownloadError> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact_opt()
            .or_else(cancel_on_interrupt)
    }
}
