// Downloader module - query, select, resolve a directory, download

pub mod backends;
pub mod diagnostics;
pub mod directory;
pub mod errors;
pub mod format_selector;
pub mod models;
pub mod selection;
pub mod tools;
pub mod traits;
pub mod utils;

pub use errors::DownloadError;
pub use models::{DownloadProgress, DownloadRequest, EncodingVariant, MediaInfo};
pub use traits::{MediaBackend, ProgressSink};
