use std::io::{self, Write};

use dialoguer::console::style;

/// Output sink handed to every component that prints.
///
/// Write failures on the terminal are ignored; there is nowhere left to report them.
pub struct Console {
    out: Box<dyn Write + Send>,
}

impl Console {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Discards everything; used by tests
    pub fn sink() -> Self {
        Self::new(Box::new(io::sink()))
    }

    pub fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
        let _ = self.out.flush();
    }

    pub fn blank(&mut self) {
        self.line("");
    }

    pub fn rule(&mut self) {
        self.line(&"=".repeat(80));
    }

    pub fn heading(&mut self, text: &str) {
        self.line(&style(text).cyan().bold().to_string());
    }

    pub fn field(&mut self, name: &str, value: &str) {
        self.line(&format!("{} {}", style(format!("{}:", name)).cyan(), value));
    }

    pub fn success(&mut self, text: &str) {
        self.line(&style(format!("✓ {}", text)).green().to_string());
    }

    pub fn notice(&mut self, text: &str) {
        self.line(&style(text).yellow().to_string());
    }

    pub fn error(&mut self, text: &str) {
        self.line(&style(format!("✗ {}", text)).red().bold().to_string());
    }
}
