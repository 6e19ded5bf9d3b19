use std::io::{self, BufRead, Stdout, Write};

use super::Prompter;
use crate::downloader::DownloadError;

/// Line-oriented prompts: numbered lists, typed answers.
/// End of input counts as a cancel.
pub struct LinePrompter<R, W> {
    reader: R,
    writer: W,
}

impl LinePrompter<io::StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn ask(&mut self, prompt: &str) -> Result<Option<String>, DownloadError> {
        write!(self.writer, "{}", prompt)?;
        self.writer.flush()?;

        // read_line retries interrupted reads itself; a SIGINT here ends the process
        let mut line = String::new();
        match self.reader.read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line.trim().to_string())),
        }
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn input(&mut self, prompt: &str) -> Result<Option<String>, DownloadError> {
        self.ask(&format!("{}: ", prompt))
    }

    fn select(
        &mut self,
        prompt: &str,
        items: &[String],
        default: usize,
    ) -> Result<Option<usize>, DownloadError> {
        for (i, item) in items.iter().enumerate() {
            writeln!(self.writer, "  {:>2}) {}", i + 1, item)?;
        }

        loop {
            let answer = match self.ask(&format!("{} [{}]: ", prompt, default + 1))? {
                Some(a) => a,
                None => return Ok(None),
            };
            if answer.is_empty() {
                return Ok(Some(default));
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=items.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => writeln!(
                    self.writer,
                    "Please enter a number between 1 and {}",
                    items.len()
                )?,
            }
        }
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<Option<bool>, DownloadError> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let answer = match self.ask(&format!("{} {}: ", prompt, hint))? {
                Some(a) => a.to_lowercase(),
                None => return Ok(None),
            };
            match answer.as_str() {
                "" => return Ok(Some(default)),
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => writeln!(self.writer, "Please answer y or n")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn prompter(input: &str) -> LinePrompter<Cursor<Vec<u8>>, Vec<u8>> {
        LinePrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_input_trims_line() {
        let mut p = prompter("  https://example.com/v  \n");
        assert_eq!(
            p.input("Enter URL").unwrap().as_deref(),
            Some("https://example.com/v")
        );
        assert_eq!(String::from_utf8_lossy(p.writer()), "Enter URL: ");
    }

    /// Fails its first read with `Interrupted`, then serves `data`
    struct InterruptedOnce {
        interrupted: bool,
        data: Cursor<Vec<u8>>,
    }

    impl io::Read for InterruptedOnce {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            self.data.read(buf)
        }
    }

    #[test]
    fn test_interrupted_read_is_retried() {
        let reader = io::BufReader::new(InterruptedOnce {
            interrupted: false,
            data: Cursor::new(b"137\n".to_vec()),
        });
        let mut p = LinePrompter::new(reader, Vec::new());
        assert_eq!(p.input("Your choice").unwrap().as_deref(), Some("137"));
    }

    #[test]
    fn test_read_failure_is_io_error() {
        struct Broken;
        impl io::Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::from(io::ErrorKind::BrokenPipe))
            }
        }

        let mut p = LinePrompter::new(io::BufReader::new(Broken), Vec::new());
        assert!(matches!(p.input("Your choice"), Err(DownloadError::Io(_))));
    }

    #[test]
    fn test_input_eof_is_cancel() {
        let mut p = prompter("");
        assert_eq!(p.input("Enter URL").unwrap(), None);
    }

    #[test]
    fn test_select_default_and_retry() {
        let items = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        let mut p = prompter("\n");
        assert_eq!(p.select("Select option", &items, 1).unwrap(), Some(1));

        let mut p = prompter("9\nx\n3\n");
        assert_eq!(p.select("Select option", &items, 0).unwrap(), Some(2));
        let out = String::from_utf8_lossy(p.writer()).to_string();
        assert!(out.contains("   1) a"));
        assert_eq!(out.matches("Please enter a number between 1 and 3").count(), 2);
    }

    #[test]
    fn test_confirm_answers() {
        let mut p = prompter("\n");
        assert_eq!(p.confirm("Create it?", true).unwrap(), Some(true));

        let mut p = prompter("maybe\nN\n");
        assert_eq!(p.confirm("Create it?", true).unwrap(), Some(false));

        let mut p = prompter("");
        assert_eq!(p.confirm("Create it?", true).unwrap(), None);
    }
}
