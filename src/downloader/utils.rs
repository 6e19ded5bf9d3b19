// Helper functions for backend implementations

use std::ffi::OsStr;
use std::process::{ExitStatus, Stdio};

use regex::Regex;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command as TokioCommand;

use super::models::{DownloadProgress, Stage};

lazy_static::lazy_static! {
    // [download]  12.5% of ~ 310.04MiB at  374.36KiB/s ETA 11:59 (frag 56/454)
    static ref PROGRESS_RE: Regex = Regex::new(
        r"^\[download\]\s+(\d+(?:\.\d+)?)%\s+of\s+~?\s*(\S+)(?:\s+at\s+(.+?/s))?(?:\s+ETA\s+(\S+))?"
    ).unwrap();
    static ref DEST_RE: Regex = Regex::new(r"^\[download\]\s+Destination:\s+(.+)$").unwrap();
    static ref MERGE_RE: Regex = Regex::new(r"^\[Merger?\]\s+Merging").unwrap();
    static ref ALREADY_RE: Regex = Regex::new(r"has already been downloaded").unwrap();
}

/// Run a command to completion and capture its output
pub async fn run_output<P: AsRef<OsStr>>(
    program: P,
    args: &[String],
) -> Result<std::process::Output, String> {
    let program = program.as_ref();
    TokioCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| format!("Failed to start {}: {}", program.to_string_lossy(), e))
}

/// Run a command, handing every stdout line to `on_line` as it arrives.
/// Returns the exit status and everything written to stderr.
pub async fn run_streaming<P, F>(
    program: P,
    args: &[String],
    mut on_line: F,
) -> Result<(ExitStatus, String), String>
where
    P: AsRef<OsStr>,
    F: FnMut(&str),
{
    let program = program.as_ref();
    let mut child = TokioCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| format!("Failed to start {}: {}", program.to_string_lossy(), e))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| "Failed to capture stdout".to_string())?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| "Failed to capture stderr".to_string())?;

    // Drain stderr concurrently so a chatty child never blocks on a full pipe
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stderr_pipe.read_to_end(&mut buf).await;
        String::from_utf8_lossy(&buf).to_string()
    });

    // Lines are decoded lossily: a title in a non-UTF-8 locale must not end the transfer
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .await
            .map_err(|e| format!("Failed to read stdout: {}", e))?;
        if n == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        on_line(line.trim_end_matches(['\r', '\n']));
    }

    let status = child
        .wait()
        .await
        .map_err(|e| format!("Failed to wait for process: {}", e))?;
    let stderr = stderr_task
        .await
        .map_err(|e| format!("stderr task failed: {}", e))?;

    Ok((status, stderr))
}

/// Parse one line of yt-dlp `--newline` output
pub fn parse_progress_line(line: &str) -> Option<DownloadProgress> {
    let line = line.trim();

    if let Some(caps) = DEST_RE.captures(line) {
        return Some(DownloadProgress {
            stage: Stage::Destination(caps[1].trim().to_string()),
            percent: 0.0,
            speed: None,
            eta: None,
        });
    }

    if ALREADY_RE.is_match(line) {
        return Some(DownloadProgress {
            stage: Stage::AlreadyDownloaded,
            percent: 100.0,
            speed: None,
            eta: None,
        });
    }

    if MERGE_RE.is_match(line) {
        return Some(DownloadProgress {
            stage: Stage::Merging,
            percent: 100.0,
            speed: None,
            eta: None,
        });
    }

    let caps = PROGRESS_RE.captures(line)?;
    let percent: f32 = caps.get(1)?.as_str().parse().ok()?;
    let known = |s: &str| !s.is_empty() && !s.starts_with("Unknown");

    Some(DownloadProgress {
        stage: Stage::Downloading,
        percent: percent.clamp(0.0, 100.0),
        speed: caps
            .get(3)
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| known(s)),
        eta: caps
            .get(4)
            .map(|m| m.as_str().to_string())
            .filter(|s| known(s)),
    })
}
