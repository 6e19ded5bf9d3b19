// Selection flow - from catalog to a single format choice
//
// Two modes share one contract:
// - Menu: quick options first, then up to 8 entries per catalog bucket
// - Free text: type a format ID, Enter for best, `q` to quit

use super::errors::DownloadError;
use super::format_selector::{Catalog, FormatSelector};
use super::models::EncodingVariant;
use crate::ui::{Console, Prompter};

/// Max entries shown per catalog bucket in menu mode
pub const MENU_BUCKET_LIMIT: usize = 8;

/// Engine selector for "best available"
pub const BEST: &str = "best";
/// Engine selector for best video merged with best audio
pub const BEST_VIDEO_AUDIO: &str = "bestvideo+bestaudio";
/// Engine selector for best audio-only stream
pub const BEST_AUDIO: &str = "bestaudio";

/// Outcome of the selection step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Best,
    /// Passed to yt-dlp uninterpreted; yt-dlp is the only validator
    Format(String),
    Cancelled,
}

impl Selection {
    /// Value for yt-dlp's `-f`; `None` when cancelled
    pub fn format_spec(&self) -> Option<&str> {
        match self {
            Self::Best => Some(BEST),
            Self::Format(f) => Some(f),
            Self::Cancelled => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Menu,
    FreeText,
}

/// One line of the format menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Choice { label: String, value: Selection },
    Separator(String),
}

impl MenuEntry {
    fn label(&self) -> String {
        match self {
            Self::Choice { label, .. } => label.clone(),
            Self::Separator(title) => format!("─── {} ───", title),
        }
    }

    fn choice(label: &str, value: Selection) -> Self {
        Self::Choice {
            label: label.to_string(),
            value,
        }
    }

    fn variant(v: &EncodingVariant) -> Self {
        Self::Choice {
            label: FormatSelector::describe_variant(v),
            value: Selection::Format(v.id.clone()),
        }
    }
}

/// Interpret a free-text answer
pub fn parse_choice(text: &str) -> Selection {
    let text = text.trim();
    if text.is_empty() || text == BEST {
        Selection::Best
    } else if text.eq_ignore_ascii_case("q") {
        Selection::Cancelled
    } else {
        Selection::Format(text.to_string())
    }
}

/// Build the format menu: quick options, then each bucket capped at 8
pub fn menu_entries(catalog: &Catalog<'_>) -> Vec<MenuEntry> {
    let mut entries = vec![
        MenuEntry::choice("⭐ Best quality (automatic)", Selection::Best),
        MenuEntry::choice(
            "🎬 Best video + audio (merged)",
            Selection::Format(BEST_VIDEO_AUDIO.to_string()),
        ),
        MenuEntry::choice(
            "🎵 Best audio only",
            Selection::Format(BEST_AUDIO.to_string()),
        ),
        MenuEntry::Separator("Combined Formats".to_string()),
    ];

    entries.extend(
        catalog
            .combined
            .iter()
            .take(MENU_BUCKET_LIMIT)
            .map(|v| MenuEntry::variant(v)),
    );

    if !catalog.video_only.is_empty() {
        entries.push(MenuEntry::Separator("Video Only".to_string()));
        entries.extend(
            catalog
                .video_only
                .iter()
                .take(MENU_BUCKET_LIMIT)
                .map(|v| MenuEntry::variant(v)),
        );
    }

    if !catalog.audio_only.is_empty() {
        entries.push(MenuEntry::Separator("Audio Only".to_string()));
        entries.extend(
            catalog
                .audio_only
                .iter()
                .take(MENU_BUCKET_LIMIT)
                .map(|v| MenuEntry::variant(v)),
        );
    }

    entries
}

/// Ask the user for a format
pub fn select_variant(
    catalog: &Catalog<'_>,
    mode: SelectionMode,
    prompter: &mut dyn Prompter,
    console: &mut Console,
) -> Result<Selection, DownloadError> {
    match mode {
        SelectionMode::Menu => select_from_menu(catalog, prompter, console),
        SelectionMode::FreeText => select_free_text(catalog, prompter, console),
    }
}

fn select_from_menu(
    catalog: &Catalog<'_>,
    prompter: &mut dyn Prompter,
    console: &mut Console,
) -> Result<Selection, DownloadError> {
    console.blank();
    console.heading("Select download format:");

    let entries = menu_entries(catalog);
    let labels: Vec<String> = entries.iter().map(MenuEntry::label).collect();
    let mut default = 0;

    loop {
        let picked = match prompter.select(
            "Use arrow keys to navigate, Enter to select",
            &labels,
            default,
        )? {
            Some(i) => i,
            None => return Ok(Selection::Cancelled),
        };

        match entries.get(picked) {
            Some(MenuEntry::Choice { value, .. }) => return Ok(value.clone()),
            // Separators are headings, not choices: ask again just below them
            Some(MenuEntry::Separator(_)) => default = (picked + 1).min(labels.len() - 1),
            None => return Err(DownloadError::Parse(format!("menu index {} out of range", picked))),
        }
    }
}

fn select_free_text(
    catalog: &Catalog<'_>,
    prompter: &mut dyn Prompter,
    console: &mut Console,
) -> Result<Selection, DownloadError> {
    console.blank();
    console.line("Available formats:");
    console.line(&"-".repeat(80));
    console.line(&FormatSelector::table_header());
    console.line(&"-".repeat(80));
    for v in catalog
        .combined
        .iter()
        .chain(&catalog.video_only)
        .chain(&catalog.audio_only)
    {
        console.line(&FormatSelector::describe_row(v));
    }

    console.blank();
    console.rule();
    console.line("Options:");
    console.line("  - Enter format ID to download specific format");
    console.line(&format!(
        "  - Type '{}' or '{}' for the engine's merged or audio-only pick",
        BEST_VIDEO_AUDIO, BEST_AUDIO
    ));
    console.line("  - Press Enter for best quality");
    console.line("  - Type 'q' to quit");
    console.rule();

    match prompter.input("Your choice")? {
        Some(text) => Ok(parse_choice(&text)),
        None => Ok(Selection::Cancelled),
    }
}
