//! Append-only activity log of tracks added to the playlist

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Plain text audit trail, one line per successful addition.
///
/// The file is opened in append mode for every entry and closed again, so
/// no handle is held between polls.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append "<timestamp> - <message>" using the current local time
    pub fn record(&self, message: &str) -> Result<()> {
        self.record_at(Local::now(), message)
    }

    pub fn record_at(&self, timestamp: DateTime<Local>, message: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open activity log: {:?}", self.path))?;

        file.write_all(format_line(timestamp, message).as_bytes())
            .with_context(|| format!("Failed to write activity log: {:?}", self.path))?;

        Ok(())
    }
}

fn format_line(timestamp: DateTime<Local>, message: &str) -> String {
    format!("{} - {}\n", timestamp.format(TIMESTAMP_FORMAT), message)
}
