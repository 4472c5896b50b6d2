//! ffprobe-backed title reader

use super::traits::TitleSource;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// How often the child is checked for completion while waiting
const WAIT_STEP: Duration = Duration::from_millis(50);

/// Reads `format_tags=StreamTitle` from a stream URL with ffprobe
#[derive(Debug, Clone)]
pub struct FfprobeTitleReader {
    ffprobe_path: PathBuf,
    stream_url: String,
    timeout: Duration,
}

impl FfprobeTitleReader {
    pub fn new(ffprobe_path: PathBuf, stream_url: String) -> Self {
        Self {
            ffprobe_path,
            stream_url,
            timeout: Duration::from_secs(10),
        }
    }

    /// Set the ceiling for a single probe run
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.ffprobe_path);
        cmd.args([
            "-v",
            "quiet",
            "-show_entries",
            "format_tags=StreamTitle",
            "-of",
            "default=nw=1:nk=1",
        ])
        .arg(&self.stream_url)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
        cmd
    }
}

impl TitleSource for FfprobeTitleReader {
    fn read_title(&mut self) -> Result<Option<String>> {
        let mut child = self
            .command()
            .spawn()
            .with_context(|| format!("Failed to run ffprobe: {:?}", self.ffprobe_path))?;

        let deadline = Instant::now() + self.timeout;
        loop {
            let status = child.try_wait().context("Failed to wait for ffprobe")?;
            match status {
                Some(_) => break,
                None if Instant::now() >= deadline => {
                    log::debug!("ffprobe timed out after {:?}", self.timeout);
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok(None);
                }
                None => thread::sleep(WAIT_STEP),
            }
        }

        let output = child
            .wait_with_output()
            .context("Failed to read ffprobe output")?;
        if !output.status.success() {
            log::debug!("ffprobe exited with {}", output.status);
        }

        Ok(normalize_title(&output.stdout))
    }
}

/// Decode probe output, trim it, and map blank output to `None`
fn normalize_title(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let title = text.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}
